use crate::context::{GuardContext, ProtoRequest, ProtoResponse};
use crate::errors::InterceptError;
use crate::lookup::TaskLookup;
use crate::stages::{Stage, StageOutcome};
use async_trait::async_trait;
use std::sync::Arc;

/// Ownership authorization. Runs only on routes flagged `owner_guard`,
/// strictly after the role stage has passed: admins bypass every lookup.
pub struct OwnerStage {
    pub lookup: Arc<dyn TaskLookup>,
}

#[async_trait]
impl Stage for OwnerStage {
    async fn handle(
        &self,
        cx: &mut GuardContext,
        _req: &mut dyn ProtoRequest,
        _rsp: &mut dyn ProtoResponse,
    ) -> Result<StageOutcome, InterceptError> {
        let Some(route) = cx.route.as_ref() else {
            return Err(InterceptError::internal(
                "owner stage reached without a bound route",
            ));
        };
        if !route.requirement.owner_guard {
            return Ok(StageOutcome::Continue);
        }
        let Some(principal) = cx.principal.as_ref() else {
            return Err(InterceptError::unauthenticated(
                "Authentication token is missing",
                "owner stage reached without a principal",
            ));
        };

        if principal.is_admin() {
            return Ok(StageOutcome::Continue);
        }

        let task_id = route.param_i64("task_id");
        let owner_id = route.param_i64("owner_id");

        if task_id.is_none() && owner_id.is_none() {
            return Err(InterceptError::validation(
                "Task ID or assigned user is missing",
            ));
        }

        if let Some(task_id) = task_id {
            let Some(task) = self.lookup.task_by_id(task_id).await? else {
                return Err(InterceptError::not_found("Task not found"));
            };
            if task.owner != principal.id {
                return Err(InterceptError::forbidden("You do not own this task"));
            }
        }

        // Independent of the task-id branch; both run when both params are
        // present. Non-empty-ownership precondition first, then identity.
        if let Some(owner_id) = owner_id {
            let total = self.lookup.count_by_owner(owner_id).await?;
            if total == 0 {
                return Err(InterceptError::forbidden("No tasks found for this user"));
            }
            if owner_id != principal.id {
                return Err(InterceptError::forbidden("You do not own these tasks"));
            }
        }

        Ok(StageOutcome::Continue)
    }
}
