use anyhow::Result;
use chrono::Utc;
use contracts::system::users::{ChangePasswordDto, RegisterDto, UpdateUserDto, User, UserRole};

use super::repository;
use crate::system::auth::password;

/// Register a new user. Email must be unique.
pub async fn register(dto: RegisterDto) -> Result<String> {
    if dto.name.trim().is_empty() {
        return Err(anyhow::anyhow!("Name cannot be empty"));
    }
    if !dto.email.contains('@') {
        return Err(anyhow::anyhow!("Invalid email format"));
    }

    if repository::get_by_email(&dto.email).await?.is_some() {
        return Err(anyhow::anyhow!("Email already exists"));
    }

    password::validate_password_strength(&dto.password)?;
    let password_hash = password::hash_password(&dto.password)?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: user_id.clone(),
        name: dto.name,
        email: dto.email,
        role: dto.role.unwrap_or(UserRole::Staff),
        department: dto.department,
        is_active: true,
        last_login: None,
        created_at: now.clone(),
        updated_at: now,
    };

    repository::create_with_password(&user, &password_hash).await?;

    Ok(user_id)
}

/// Update user fields; absent fields keep their current value
pub async fn update(id: &str, dto: UpdateUserDto) -> Result<Option<User>> {
    let mut user = match repository::get_by_id(id).await? {
        Some(u) => u,
        None => return Ok(None),
    };

    if let Some(ref email) = dto.email {
        if !email.contains('@') {
            return Err(anyhow::anyhow!("Invalid email format"));
        }
    }

    if let Some(name) = dto.name {
        user.name = name;
    }
    if let Some(email) = dto.email {
        user.email = email;
    }
    if let Some(role) = dto.role {
        user.role = role;
    }
    if dto.department.is_some() {
        user.department = dto.department;
    }
    if let Some(is_active) = dto.is_active {
        user.is_active = is_active;
    }
    user.updated_at = Utc::now().to_rfc3339();

    repository::update(&user).await?;

    Ok(Some(user))
}

pub async fn delete(id: &str) -> Result<bool> {
    repository::delete(id).await
}

pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> Result<Vec<User>> {
    repository::list_all().await
}

/// Change the caller's own password after verifying the current one
pub async fn change_password(user_id: &str, dto: ChangePasswordDto) -> Result<()> {
    let current_hash = repository::get_password_hash(user_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("User not found"))?;

    if !password::verify_password(&dto.current_password, &current_hash)? {
        return Err(anyhow::anyhow!("Current password is incorrect"));
    }

    password::validate_password_strength(&dto.new_password)?;
    let new_hash = password::hash_password(&dto.new_password)?;

    repository::update_password(user_id, &new_hash).await?;

    Ok(())
}

/// Verify user credentials (for login). Returns None on unknown email or
/// wrong password; inactive accounts are rejected with an error.
pub async fn verify_credentials(email: &str, plain_password: &str) -> Result<Option<User>> {
    let user = match repository::get_by_email(email).await? {
        Some(u) => u,
        None => return Ok(None),
    };

    if !user.is_active {
        return Err(anyhow::anyhow!("Account is deactivated"));
    }

    let password_hash = repository::get_password_hash(&user.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Password hash not found"))?;

    if !password::verify_password(plain_password, &password_hash)? {
        return Ok(None);
    }

    // A failed timestamp bump must not block the login
    if let Err(e) = repository::update_last_login(&user.id).await {
        tracing::warn!("Failed to update last login for {}: {:#}", user.id, e);
    }

    Ok(Some(user))
}
