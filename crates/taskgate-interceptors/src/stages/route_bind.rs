use crate::context::{GuardContext, ProtoRequest, ProtoResponse};
use crate::errors::InterceptError;
use crate::routes::RouteTable;
use crate::stages::{Stage, StageOutcome};
use async_trait::async_trait;
use std::sync::Arc;

pub struct RouteBindStage {
    pub table: Arc<RouteTable>,
}

#[async_trait]
impl Stage for RouteBindStage {
    async fn handle(
        &self,
        cx: &mut GuardContext,
        req: &mut dyn ProtoRequest,
        _rsp: &mut dyn ProtoResponse,
    ) -> Result<StageOutcome, InterceptError> {
        let Some(bound) = self.table.match_http(req.method(), req.path()) else {
            return Err(InterceptError::not_found("Route not declared"));
        };
        cx.route = Some(bound);
        Ok(StageOutcome::Continue)
    }
}
