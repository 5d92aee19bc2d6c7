use axum::extract::{Json, Path, Query};
use contracts::domain::project::{
    Project, ProjectDto, ProjectFilter, ProjectStats, TaskDto, TaskUpdateDto,
};
use serde_json::{json, Value};

use contracts::system::users::UserRole;

use crate::domain::a003_project::service;
use crate::shared::error::ApiError;
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::middleware::ensure_role;

/// GET /api/projects
pub async fn list(Query(filter): Query<ProjectFilter>) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = service::list(&filter)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch projects", e))?;
    Ok(Json(projects))
}

/// GET /api/projects/stats
pub async fn stats() -> Result<Json<ProjectStats>, ApiError> {
    let stats = service::stats()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch project stats", e))?;
    Ok(Json(stats))
}

/// GET /api/projects/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Project>, ApiError> {
    let project = service::get_by_id(&id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch project", e))?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;
    Ok(Json(project))
}

/// POST /api/projects (manager)
pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<ProjectDto>,
) -> Result<Json<Project>, ApiError> {
    ensure_role(&claims, &[UserRole::Admin, UserRole::Manager])?;
    let project = service::create(dto, Some(claims.name))
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?;
    Ok(Json(project))
}

/// PUT /api/projects/:id (manager)
pub async fn update(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<ProjectDto>,
) -> Result<Json<Project>, ApiError> {
    ensure_role(&claims, &[UserRole::Admin, UserRole::Manager])?;
    let project = service::update(&id, dto)
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;
    Ok(Json(project))
}

/// DELETE /api/projects/:id (admin)
pub async fn delete(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    ensure_role(&claims, &[UserRole::Admin])?;
    let deleted = service::delete(&id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete project", e))?;

    if !deleted {
        return Err(ApiError::not_found("Project not found"));
    }

    Ok(Json(json!({ "message": "Project deleted successfully" })))
}

/// POST /api/projects/:id/tasks (manager)
pub async fn add_task(
    Path(id): Path<String>,
    Json(dto): Json<TaskDto>,
) -> Result<Json<Project>, ApiError> {
    let project = service::add_task(&id, dto)
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;
    Ok(Json(project))
}

/// PUT /api/projects/:id/tasks/:task_id (manager)
pub async fn update_task(
    Path((id, task_id)): Path<(String, String)>,
    Json(dto): Json<TaskUpdateDto>,
) -> Result<Json<Project>, ApiError> {
    let project = service::update_task(&id, &task_id, dto)
        .await
        .map_err(|e| ApiError::internal("Failed to update task", e))?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    Ok(Json(project))
}

/// PATCH /api/projects/:id/tasks/:task_id/toggle
pub async fn toggle_task(
    Path((id, task_id)): Path<(String, String)>,
) -> Result<Json<Project>, ApiError> {
    let project = service::toggle_task(&id, &task_id)
        .await
        .map_err(|e| ApiError::internal("Failed to toggle task", e))?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    Ok(Json(project))
}

/// DELETE /api/projects/:id/tasks/:task_id (manager)
pub async fn delete_task(
    Path((id, task_id)): Path<(String, String)>,
) -> Result<Json<Project>, ApiError> {
    let project = service::delete_task(&id, &task_id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete task", e))?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    Ok(Json(project))
}
