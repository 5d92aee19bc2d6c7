use anyhow::Result;
use contracts::system::users::{RegisterDto, UserRole};

/// Ensure an admin user exists (create if the user table is empty)
pub async fn ensure_admin_user_exists() -> Result<()> {
    use crate::system::users::{repository, service};

    let count = repository::count_users().await?;

    if count == 0 {
        tracing::info!("No users found. Creating default admin user...");

        let admin_dto = RegisterDto {
            name: "Administrator".to_string(),
            email: "admin@example.com".to_string(),
            password: "admin123".to_string(),
            role: Some(UserRole::Admin),
            department: None,
        };

        let admin_id = service::register(admin_dto).await?;

        tracing::warn!("Default admin user created (id: {})", admin_id);
        tracing::warn!("  Email: admin@example.com / Password: admin123");
        tracing::warn!("  Please change the password immediately!");
    }

    Ok(())
}
