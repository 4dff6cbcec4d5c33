use crate::context::{GuardContext, ProtoRequest, ProtoResponse};
use crate::errors::InterceptError;
use crate::stages::{Stage, StageOutcome};
use async_trait::async_trait;
use taskgate_auth::prelude::Authenticator;

pub struct AuthnStage {
    pub authenticator: Box<dyn Authenticator>,
}

#[async_trait]
impl Stage for AuthnStage {
    async fn handle(
        &self,
        cx: &mut GuardContext,
        req: &mut dyn ProtoRequest,
        _rsp: &mut dyn ProtoResponse,
    ) -> Result<StageOutcome, InterceptError> {
        let Some(authorization) = req.header("Authorization") else {
            return Err(InterceptError::unauthenticated(
                "Authentication token is missing",
                "no Authorization header",
            ));
        };
        let Some(token) = authorization.strip_prefix("Bearer ") else {
            return Err(InterceptError::unauthenticated(
                "Authentication token is missing",
                "Authorization header is not a bearer credential",
            ));
        };

        let principal = self
            .authenticator
            .authenticate(token)
            .await
            .map_err(|e| InterceptError::from_error(e.into_inner()))?;
        cx.principal = Some(principal);
        Ok(StageOutcome::Continue)
    }
}
