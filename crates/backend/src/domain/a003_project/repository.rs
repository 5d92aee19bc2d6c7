use std::collections::HashMap;

use contracts::domain::project::{
    Priority, Project, ProjectFilter, ProjectStats, ProjectStatus, Task, TaskStats, TaskStatus,
};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseBackend, DatabaseTransaction, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Set, Statement, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

pub mod project_entity {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a003_project")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub title: String,
        pub description: Option<String>,
        pub status: String,
        pub priority: String,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
        pub budget: Option<f64>,
        pub manager: Option<String>,
        /// JSON array of member names
        pub team: String,
        pub progress: i32,
        pub created_at: Option<String>,
        pub updated_at: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod task_entity {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a003_project_task")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub project_id: String,
        pub title: String,
        pub description: Option<String>,
        pub assignee: Option<String>,
        pub priority: String,
        pub status: String,
        pub due_date: Option<String>,
        pub done: bool,
        pub position: i32,
        pub created_at: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

fn parse_project_status(raw: &str) -> ProjectStatus {
    match raw {
        "active" => ProjectStatus::Active,
        "on-hold" => ProjectStatus::OnHold,
        "completed" => ProjectStatus::Completed,
        "cancelled" => ProjectStatus::Cancelled,
        _ => ProjectStatus::Planning,
    }
}

fn parse_priority(raw: &str) -> Priority {
    match raw {
        "low" => Priority::Low,
        "high" => Priority::High,
        _ => Priority::Medium,
    }
}

fn parse_task_status(raw: &str) -> TaskStatus {
    match raw {
        "in-progress" => TaskStatus::InProgress,
        "review" => TaskStatus::Review,
        "done" => TaskStatus::Done,
        _ => TaskStatus::Todo,
    }
}

fn parse_team(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

impl From<task_entity::Model> for Task {
    fn from(m: task_entity::Model) -> Self {
        Task {
            id: m.id,
            title: m.title,
            description: m.description,
            assignee: m.assignee,
            priority: parse_priority(&m.priority),
            status: parse_task_status(&m.status),
            due_date: m.due_date,
            done: m.done,
            created_at: m.created_at.unwrap_or_default(),
        }
    }
}

fn to_project(m: project_entity::Model, tasks: Vec<Task>) -> Project {
    Project {
        id: m.id,
        title: m.title,
        description: m.description,
        status: parse_project_status(&m.status),
        priority: parse_priority(&m.priority),
        start_date: m.start_date,
        end_date: m.end_date,
        budget: m.budget,
        manager: m.manager,
        team: parse_team(&m.team),
        tasks,
        progress: m.progress,
        created_at: m.created_at.unwrap_or_default(),
        updated_at: m.updated_at.unwrap_or_default(),
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn project_active_model(p: &Project) -> anyhow::Result<project_entity::ActiveModel> {
    Ok(project_entity::ActiveModel {
        id: Set(p.id.clone()),
        title: Set(p.title.clone()),
        description: Set(p.description.clone()),
        status: Set(p.status.as_str().to_string()),
        priority: Set(p.priority.as_str().to_string()),
        start_date: Set(p.start_date.clone()),
        end_date: Set(p.end_date.clone()),
        budget: Set(p.budget),
        manager: Set(p.manager.clone()),
        team: Set(serde_json::to_string(&p.team)?),
        progress: Set(p.progress),
        created_at: Set(Some(p.created_at.clone())),
        updated_at: Set(Some(p.updated_at.clone())),
    })
}

fn task_active_model(project_id: &str, task: &Task, position: i32) -> task_entity::ActiveModel {
    task_entity::ActiveModel {
        id: Set(task.id.clone()),
        project_id: Set(project_id.to_string()),
        title: Set(task.title.clone()),
        description: Set(task.description.clone()),
        assignee: Set(task.assignee.clone()),
        priority: Set(task.priority.as_str().to_string()),
        status: Set(task.status.as_str().to_string()),
        due_date: Set(task.due_date.clone()),
        done: Set(task.done),
        position: Set(position),
        created_at: Set(Some(task.created_at.clone())),
    }
}

async fn tasks_for<C: ConnectionTrait>(db: &C, project_id: &str) -> anyhow::Result<Vec<Task>> {
    let tasks = task_entity::Entity::find()
        .filter(task_entity::Column::ProjectId.eq(project_id))
        .order_by_asc(task_entity::Column::Position)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(tasks)
}

/// List projects with their tasks, newest first
pub async fn list(filter: &ProjectFilter) -> anyhow::Result<Vec<Project>> {
    let mut query = project_entity::Entity::find();

    if let Some(status) = filter.status {
        query = query.filter(project_entity::Column::Status.eq(status.as_str()));
    }
    if let Some(priority) = filter.priority {
        query = query.filter(project_entity::Column::Priority.eq(priority.as_str()));
    }
    if let Some(ref search) = filter.search {
        let pattern = format!("%{}%", search);
        query = query.filter(
            Condition::any()
                .add(project_entity::Column::Title.like(pattern.as_str()))
                .add(project_entity::Column::Description.like(pattern.as_str())),
        );
    }

    let rows = query
        .order_by_desc(project_entity::Column::CreatedAt)
        .all(conn())
        .await?;

    let mut projects = Vec::with_capacity(rows.len());
    for row in rows {
        let tasks = tasks_for(conn(), &row.id).await?;
        projects.push(to_project(row, tasks));
    }
    Ok(projects)
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Project>> {
    let Some(row) = project_entity::Entity::find_by_id(id.to_string())
        .one(conn())
        .await?
    else {
        return Ok(None);
    };
    let tasks = tasks_for(conn(), id).await?;
    Ok(Some(to_project(row, tasks)))
}

pub async fn insert(project: &Project) -> anyhow::Result<()> {
    project_active_model(project)?.insert(conn()).await?;
    Ok(())
}

pub async fn update(project: &Project) -> anyhow::Result<()> {
    project_active_model(project)?.update(conn()).await?;
    Ok(())
}

/// Delete a project and its tasks
pub async fn delete(id: &str) -> anyhow::Result<bool> {
    let txn = conn().begin().await?;
    task_entity::Entity::delete_many()
        .filter(task_entity::Column::ProjectId.eq(id.to_string()))
        .exec(&txn)
        .await?;
    let result = project_entity::Entity::delete_by_id(id.to_string())
        .exec(&txn)
        .await?;
    txn.commit().await?;
    Ok(result.rows_affected > 0)
}

async fn next_position(txn: &DatabaseTransaction, project_id: &str) -> anyhow::Result<i32> {
    #[derive(Debug, FromQueryResult)]
    struct MaxRow {
        max_position: Option<i32>,
    }

    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "SELECT MAX(position) AS max_position FROM a003_project_task WHERE project_id = ?",
        [project_id.into()],
    );
    let row = MaxRow::find_by_statement(stmt).one(txn).await?;
    Ok(row.and_then(|r| r.max_position).unwrap_or(-1) + 1)
}

async fn persist_progress(
    txn: &DatabaseTransaction,
    project_id: &str,
    progress: i32,
) -> anyhow::Result<()> {
    project_entity::Entity::update_many()
        .col_expr(
            project_entity::Column::Progress,
            sea_orm::sea_query::Expr::value(progress),
        )
        .col_expr(
            project_entity::Column::UpdatedAt,
            sea_orm::sea_query::Expr::value(chrono::Utc::now().to_rfc3339()),
        )
        .filter(project_entity::Column::Id.eq(project_id.to_string()))
        .exec(txn)
        .await?;
    Ok(())
}

/// Insert a task and persist the recomputed progress in one transaction.
/// Returns the full task list after the write.
pub async fn insert_task(
    project_id: &str,
    task: &Task,
    progress_of: impl Fn(&[Task]) -> i32,
) -> anyhow::Result<Vec<Task>> {
    let txn = conn().begin().await?;
    let position = next_position(&txn, project_id).await?;
    task_active_model(project_id, task, position).insert(&txn).await?;
    let tasks = tasks_for(&txn, project_id).await?;
    persist_progress(&txn, project_id, progress_of(&tasks)).await?;
    txn.commit().await?;
    Ok(tasks)
}

/// Update a task in place and persist the recomputed progress in one
/// transaction. Position is preserved.
pub async fn update_task(
    project_id: &str,
    task: &Task,
    progress_of: impl Fn(&[Task]) -> i32,
) -> anyhow::Result<Vec<Task>> {
    let txn = conn().begin().await?;

    let existing = task_entity::Entity::find_by_id(task.id.clone())
        .filter(task_entity::Column::ProjectId.eq(project_id.to_string()))
        .one(&txn)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Task not found"))?;

    task_active_model(project_id, task, existing.position)
        .update(&txn)
        .await?;

    let tasks = tasks_for(&txn, project_id).await?;
    persist_progress(&txn, project_id, progress_of(&tasks)).await?;
    txn.commit().await?;
    Ok(tasks)
}

/// Delete a task and persist the recomputed progress in one transaction.
/// Returns None when the task does not belong to the project.
pub async fn delete_task(
    project_id: &str,
    task_id: &str,
    progress_of: impl Fn(&[Task]) -> i32,
) -> anyhow::Result<Option<Vec<Task>>> {
    let txn = conn().begin().await?;

    let result = task_entity::Entity::delete_many()
        .filter(task_entity::Column::Id.eq(task_id.to_string()))
        .filter(task_entity::Column::ProjectId.eq(project_id.to_string()))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Ok(None);
    }

    let tasks = tasks_for(&txn, project_id).await?;
    persist_progress(&txn, project_id, progress_of(&tasks)).await?;
    txn.commit().await?;
    Ok(Some(tasks))
}

/// Grouped project statistics
pub async fn stats() -> anyhow::Result<ProjectStats> {
    #[derive(Debug, FromQueryResult)]
    struct GroupRow {
        key: String,
        count: i64,
    }

    #[derive(Debug, FromQueryResult)]
    struct TaskRow {
        total: i64,
        completed: i64,
    }

    let status_stmt = Statement::from_string(
        DatabaseBackend::Sqlite,
        "SELECT status AS key, COUNT(*) AS count FROM a003_project GROUP BY status".to_string(),
    );
    let priority_stmt = Statement::from_string(
        DatabaseBackend::Sqlite,
        "SELECT priority AS key, COUNT(*) AS count FROM a003_project GROUP BY priority".to_string(),
    );
    let task_stmt = Statement::from_string(
        DatabaseBackend::Sqlite,
        "SELECT COUNT(*) AS total, COALESCE(SUM(CASE WHEN done THEN 1 ELSE 0 END), 0) AS completed FROM a003_project_task"
            .to_string(),
    );

    let status_rows = GroupRow::find_by_statement(status_stmt).all(conn()).await?;
    let priority_rows = GroupRow::find_by_statement(priority_stmt).all(conn()).await?;
    let task_row = TaskRow::find_by_statement(task_stmt).one(conn()).await?;

    use sea_orm::PaginatorTrait;
    let total_projects = project_entity::Entity::find().count(conn()).await? as i64;

    let collect = |rows: Vec<GroupRow>| -> HashMap<String, i64> {
        rows.into_iter().map(|r| (r.key, r.count)).collect()
    };

    Ok(ProjectStats {
        total_projects,
        status_counts: collect(status_rows),
        priority_counts: collect(priority_rows),
        task_stats: task_row
            .map(|r| TaskStats {
                total: r.total,
                completed: r.completed,
            })
            .unwrap_or(TaskStats {
                total: 0,
                completed: 0,
            }),
    })
}

pub async fn count() -> anyhow::Result<i64> {
    use sea_orm::PaginatorTrait;
    let count = project_entity::Entity::find().count(conn()).await?;
    Ok(count as i64)
}

/// Active projects, newest first, bounded by `limit`
pub async fn active(limit: u64) -> anyhow::Result<Vec<Project>> {
    let rows = project_entity::Entity::find()
        .filter(project_entity::Column::Status.eq("active"))
        .order_by_desc(project_entity::Column::CreatedAt)
        .limit(limit)
        .all(conn())
        .await?;

    let mut projects = Vec::with_capacity(rows.len());
    for row in rows {
        let tasks = tasks_for(conn(), &row.id).await?;
        projects.push(to_project(row, tasks));
    }
    Ok(projects)
}

/// High-priority projects that are not completed or cancelled, bounded by `limit`
pub async fn high_priority_open(limit: u64) -> anyhow::Result<Vec<Project>> {
    let rows = project_entity::Entity::find()
        .filter(project_entity::Column::Priority.eq("high"))
        .filter(project_entity::Column::Status.is_not_in(["completed", "cancelled"]))
        .order_by_desc(project_entity::Column::CreatedAt)
        .limit(limit)
        .all(conn())
        .await?;

    let mut projects = Vec::with_capacity(rows.len());
    for row in rows {
        let tasks = tasks_for(conn(), &row.id).await?;
        projects.push(to_project(row, tasks));
    }
    Ok(projects)
}
