// src/services/task_service.rs

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::TaskRepository,
    models::task::{CreateTaskPayload, Task, UpdateTaskPayload},
    services::populate::Populator,
};

#[derive(Clone)]
pub struct TaskService {
    repo: TaskRepository,
    populator: Populator,
}

impl TaskService {
    pub fn new(repo: TaskRepository, populator: Populator) -> Self {
        Self { repo, populator }
    }

    pub async fn list(&self) -> Result<Vec<Task>, AppError> {
        let mut tasks: Vec<Task> = self.repo.list_all().await?.into_iter().map(Task::from).collect();
        self.populator.tasks(&mut tasks).await?;
        Ok(tasks)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Task, AppError> {
        let row = self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Task"))?;
        let mut tasks = [Task::from(row)];
        self.populator.tasks(&mut tasks).await?;
        let [task] = tasks;
        Ok(task)
    }

    pub async fn create(&self, payload: CreateTaskPayload, created_by: Uuid) -> Result<Task, AppError> {
        payload.validate()?;
        let row = self.repo.create(&payload, created_by).await?;
        tracing::info!("Tarefa criada: {}", row.id);
        Ok(Task::from(row))
    }

    pub async fn update(&self, id: Uuid, payload: UpdateTaskPayload) -> Result<Task, AppError> {
        payload.validate()?;
        let row = self.repo.update(id, &payload).await?.ok_or(AppError::NotFound("Task"))?;
        Ok(Task::from(row))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Task"));
        }
        Ok(())
    }
}
