use crate::context::{GuardContext, ProtoRequest, ProtoResponse};
use crate::errors::InterceptError;
use async_trait::async_trait;
use futures::future::BoxFuture;

pub mod authn;
pub mod context_init;
pub mod owner;
pub mod response_stamp;
pub mod roles;
pub mod route_bind;

#[async_trait]
pub trait Stage: Send + Sync {
    async fn handle(
        &self,
        cx: &mut GuardContext,
        req: &mut dyn ProtoRequest,
        rsp: &mut dyn ProtoResponse,
    ) -> Result<StageOutcome, InterceptError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageOutcome {
    Continue,
    ShortCircuit,
}

/// Ordered, short-circuiting admission pipeline. Stages run strictly in
/// sequence; the first failure stops the chain. A passing request's handler
/// is invoked through the bound route's circuit breaker.
pub struct GuardChain {
    stages: Vec<Box<dyn Stage>>,
}

impl GuardChain {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    pub async fn run_with_handler<F>(
        &self,
        mut cx: GuardContext,
        req: &mut dyn ProtoRequest,
        rsp: &mut dyn ProtoResponse,
        handler: F,
    ) -> Result<(), InterceptError>
    where
        F: for<'a> FnOnce(
                &'a mut GuardContext,
                &'a mut dyn ProtoRequest,
            ) -> BoxFuture<'a, Result<serde_json::Value, InterceptError>>
            + Send,
    {
        for stage in &self.stages {
            match stage.handle(&mut cx, req, rsp).await? {
                StageOutcome::Continue => {}
                StageOutcome::ShortCircuit => return Ok(()),
            }
        }

        let breaker = cx.route.as_ref().map(|route| route.breaker.clone());
        let fut = handler(&mut cx, req);
        let body = match breaker {
            Some(breaker) => breaker.call(fut).await?,
            None => fut.await?,
        };
        rsp.set_status(200);
        rsp.write_json(&body).await?;
        Ok(())
    }
}
