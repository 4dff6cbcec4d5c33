use crate::context::{GuardContext, ProtoRequest, ProtoResponse};
use crate::errors::InterceptError;
use crate::stages::{Stage, StageOutcome};
use async_trait::async_trait;

pub struct ResponseStampStage;

#[async_trait]
impl Stage for ResponseStampStage {
    async fn handle(
        &self,
        cx: &mut GuardContext,
        _req: &mut dyn ProtoRequest,
        rsp: &mut dyn ProtoResponse,
    ) -> Result<StageOutcome, InterceptError> {
        rsp.insert_header("X-Request-Id", &cx.request_id);
        Ok(StageOutcome::Continue)
    }
}
