use crate::context::{GuardContext, ProtoRequest, ProtoResponse};
use crate::errors::InterceptError;
use crate::stages::{Stage, StageOutcome};
use async_trait::async_trait;

pub struct ContextInitStage;

#[async_trait]
impl Stage for ContextInitStage {
    async fn handle(
        &self,
        cx: &mut GuardContext,
        req: &mut dyn ProtoRequest,
        _rsp: &mut dyn ProtoResponse,
    ) -> Result<StageOutcome, InterceptError> {
        cx.request_id = req
            .header("X-Request-Id")
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        Ok(StageOutcome::Continue)
    }
}
