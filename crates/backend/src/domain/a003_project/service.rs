use chrono::Utc;
use contracts::domain::project::{
    Priority, Project, ProjectDto, ProjectFilter, ProjectStats, ProjectStatus, Task, TaskDto,
    TaskStatus, TaskUpdateDto,
};
use uuid::Uuid;

use super::repository;

/// Flip a task's `done` flag and keep `status` aligned with it
/// (done ⇄ 'done', not done ⇄ 'todo').
pub fn toggle_done(task: &mut Task) {
    task.done = !task.done;
    task.status = if task.done {
        TaskStatus::Done
    } else {
        TaskStatus::Todo
    };
}

/// Share of completed tasks as a whole percentage. Empty task lists map to 0.
pub fn compute_progress(tasks: &[Task]) -> i32 {
    if tasks.is_empty() {
        return 0;
    }
    let done = tasks.iter().filter(|t| t.done).count() as f64;
    let total = tasks.len() as f64;
    (100.0 * done / total).round() as i32
}

pub async fn list(filter: &ProjectFilter) -> anyhow::Result<Vec<Project>> {
    repository::list(filter).await
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Project>> {
    repository::get_by_id(id).await
}

/// `default_manager` is the caller's name, used when the payload names none.
pub async fn create(dto: ProjectDto, default_manager: Option<String>) -> anyhow::Result<Project> {
    if dto.title.trim().is_empty() {
        anyhow::bail!("Project title is required");
    }

    let now = Utc::now().to_rfc3339();
    let project = Project {
        id: Uuid::new_v4().to_string(),
        title: dto.title,
        description: dto.description,
        status: dto.status.unwrap_or(ProjectStatus::Planning),
        priority: dto.priority.unwrap_or(Priority::Medium),
        start_date: dto.start_date,
        end_date: dto.end_date,
        budget: dto.budget,
        manager: dto.manager.or(default_manager),
        team: dto.team.unwrap_or_default(),
        tasks: Vec::new(),
        progress: 0,
        created_at: now.clone(),
        updated_at: now,
    };

    repository::insert(&project).await?;
    Ok(project)
}

/// Merge a partial update into a project; absent fields keep their value.
fn apply_update(project: &mut Project, dto: ProjectDto) {
    project.title = dto.title;
    if dto.description.is_some() {
        project.description = dto.description;
    }
    if let Some(status) = dto.status {
        project.status = status;
    }
    if let Some(priority) = dto.priority {
        project.priority = priority;
    }
    if dto.start_date.is_some() {
        project.start_date = dto.start_date;
    }
    if dto.end_date.is_some() {
        project.end_date = dto.end_date;
    }
    if dto.budget.is_some() {
        project.budget = dto.budget;
    }
    if dto.manager.is_some() {
        project.manager = dto.manager;
    }
    if let Some(team) = dto.team {
        project.team = team;
    }
}

pub async fn update(id: &str, dto: ProjectDto) -> anyhow::Result<Option<Project>> {
    let Some(mut project) = repository::get_by_id(id).await? else {
        return Ok(None);
    };

    if dto.title.trim().is_empty() {
        anyhow::bail!("Project title is required");
    }

    apply_update(&mut project, dto);
    project.updated_at = Utc::now().to_rfc3339();

    repository::update(&project).await?;
    Ok(Some(project))
}

pub async fn delete(id: &str) -> anyhow::Result<bool> {
    repository::delete(id).await
}

pub async fn stats() -> anyhow::Result<ProjectStats> {
    repository::stats().await
}

/// Add a task to a project. Returns the project with refreshed tasks and
/// progress, or None when the project does not exist.
pub async fn add_task(project_id: &str, dto: TaskDto) -> anyhow::Result<Option<Project>> {
    let Some(mut project) = repository::get_by_id(project_id).await? else {
        return Ok(None);
    };

    if dto.title.trim().is_empty() {
        anyhow::bail!("Task title is required");
    }

    let task = Task {
        id: Uuid::new_v4().to_string(),
        title: dto.title,
        description: dto.description,
        assignee: dto.assignee,
        priority: dto.priority.unwrap_or(Priority::Medium),
        status: TaskStatus::Todo,
        due_date: dto.due_date,
        done: false,
        created_at: Utc::now().to_rfc3339(),
    };

    let tasks = repository::insert_task(project_id, &task, compute_progress).await?;
    project.progress = compute_progress(&tasks);
    project.tasks = tasks;
    project.updated_at = Utc::now().to_rfc3339();
    Ok(Some(project))
}

/// Partially update a task. `done` and `status` are applied independently;
/// only the toggle keeps them in sync.
pub async fn update_task(
    project_id: &str,
    task_id: &str,
    dto: TaskUpdateDto,
) -> anyhow::Result<Option<Project>> {
    let Some(mut project) = repository::get_by_id(project_id).await? else {
        return Ok(None);
    };

    let Some(task) = project.tasks.iter_mut().find(|t| t.id == task_id) else {
        return Ok(None);
    };

    if let Some(title) = dto.title {
        task.title = title;
    }
    if dto.description.is_some() {
        task.description = dto.description;
    }
    if dto.assignee.is_some() {
        task.assignee = dto.assignee;
    }
    if let Some(priority) = dto.priority {
        task.priority = priority;
    }
    if let Some(status) = dto.status {
        task.status = status;
    }
    if dto.due_date.is_some() {
        task.due_date = dto.due_date;
    }
    if let Some(done) = dto.done {
        task.done = done;
    }

    let task = task.clone();
    let tasks = repository::update_task(project_id, &task, compute_progress).await?;
    project.progress = compute_progress(&tasks);
    project.tasks = tasks;
    project.updated_at = Utc::now().to_rfc3339();
    Ok(Some(project))
}

/// Flip a task's `done` flag and align `status` with it.
pub async fn toggle_task(project_id: &str, task_id: &str) -> anyhow::Result<Option<Project>> {
    let Some(mut project) = repository::get_by_id(project_id).await? else {
        return Ok(None);
    };

    let Some(task) = project.tasks.iter_mut().find(|t| t.id == task_id) else {
        return Ok(None);
    };

    toggle_done(task);

    let task = task.clone();
    let tasks = repository::update_task(project_id, &task, compute_progress).await?;
    project.progress = compute_progress(&tasks);
    project.tasks = tasks;
    project.updated_at = Utc::now().to_rfc3339();
    Ok(Some(project))
}

pub async fn delete_task(project_id: &str, task_id: &str) -> anyhow::Result<Option<Project>> {
    let Some(mut project) = repository::get_by_id(project_id).await? else {
        return Ok(None);
    };

    let Some(tasks) = repository::delete_task(project_id, task_id, compute_progress).await? else {
        return Ok(None);
    };

    project.progress = compute_progress(&tasks);
    project.tasks = tasks;
    project.updated_at = Utc::now().to_rfc3339();
    Ok(Some(project))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(done: bool) -> Task {
        Task {
            id: Uuid::new_v4().to_string(),
            title: "t".into(),
            description: None,
            assignee: None,
            priority: Priority::Medium,
            status: if done { TaskStatus::Done } else { TaskStatus::Todo },
            due_date: None,
            done,
            created_at: String::new(),
        }
    }

    #[test]
    fn progress_of_empty_list_is_zero() {
        assert_eq!(compute_progress(&[]), 0);
    }

    #[test]
    fn progress_rounds_to_nearest_whole_percent() {
        let tasks = vec![task(true), task(false), task(false)];
        assert_eq!(compute_progress(&tasks), 33);

        let tasks = vec![task(true), task(true), task(false)];
        assert_eq!(compute_progress(&tasks), 67);
    }

    #[test]
    fn progress_of_all_done_is_hundred() {
        let tasks = vec![task(true), task(true)];
        assert_eq!(compute_progress(&tasks), 100);
    }

    #[test]
    fn double_toggle_restores_the_original_pair() {
        let mut t = task(false);
        assert_eq!(t.status, TaskStatus::Todo);

        toggle_done(&mut t);
        assert!(t.done);
        assert_eq!(t.status, TaskStatus::Done);

        toggle_done(&mut t);
        assert!(!t.done);
        assert_eq!(t.status, TaskStatus::Todo);
    }

    #[test]
    fn toggle_normalizes_an_unsynced_status() {
        let mut t = task(false);
        t.status = TaskStatus::InProgress;

        toggle_done(&mut t);
        assert_eq!(t.status, TaskStatus::Done);

        toggle_done(&mut t);
        assert_eq!(t.status, TaskStatus::Todo);
    }

    #[test]
    fn update_keeps_fields_absent_from_the_payload() {
        let mut project = Project {
            id: "p1".into(),
            title: "Warehouse move".into(),
            description: Some("Relocate stock to the new site".into()),
            status: ProjectStatus::Active,
            priority: Priority::High,
            start_date: Some("2026-01-01".into()),
            end_date: None,
            budget: Some(5_000_000.0),
            manager: Some("Dewi".into()),
            team: vec!["Agus".into()],
            tasks: Vec::new(),
            progress: 0,
            created_at: String::new(),
            updated_at: String::new(),
        };

        apply_update(
            &mut project,
            ProjectDto {
                title: "Warehouse move phase 2".into(),
                description: None,
                status: Some(ProjectStatus::OnHold),
                priority: None,
                start_date: None,
                end_date: None,
                budget: None,
                manager: None,
                team: None,
            },
        );

        assert_eq!(project.title, "Warehouse move phase 2");
        assert_eq!(
            project.description.as_deref(),
            Some("Relocate stock to the new site")
        );
        assert_eq!(project.status, ProjectStatus::OnHold);
        assert_eq!(project.priority, Priority::High);
        assert_eq!(project.budget, Some(5_000_000.0));
        assert_eq!(project.manager.as_deref(), Some("Dewi"));
        assert_eq!(project.team, vec!["Agus".to_string()]);
    }
}
