use crate::errors::InterceptError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The slice of a task the admission pipeline needs to see.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: i64,
    pub owner: i64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Resource-lookup collaborator consumed by the ownership stage. Backed by
/// the persistence layer; the pipeline only sees this interface.
#[async_trait]
pub trait TaskLookup: Send + Sync {
    async fn task_by_id(&self, id: i64) -> Result<Option<TaskRecord>, InterceptError>;

    /// Dedicated existence/count query for the non-empty-ownership rule.
    /// Deliberately not a paginated fetch: the caller only needs the total.
    async fn count_by_owner(&self, owner_id: i64) -> Result<u64, InterceptError>;

    async fn list_by_owner(
        &self,
        owner_id: i64,
        page: Page,
    ) -> Result<PageResult<TaskRecord>, InterceptError>;
}
