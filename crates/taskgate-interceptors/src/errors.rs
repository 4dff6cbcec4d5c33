use taskgate_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct InterceptError(pub ErrorObj);

impl InterceptError {
    pub fn into_inner(self) -> ErrorObj {
        self.0
    }

    pub fn from_error(err: ErrorObj) -> Self {
        InterceptError(err)
    }

    pub fn internal(msg: &str) -> Self {
        InterceptError(
            ErrorBuilder::new(codes::UNKNOWN_INTERNAL)
                .dev_msg(msg)
                .build(),
        )
    }

    pub fn timeout(msg: &str) -> Self {
        InterceptError(
            ErrorBuilder::new(codes::UPSTREAM_TIMEOUT)
                .dev_msg(msg)
                .build(),
        )
    }

    pub fn unauthenticated(user_msg: &str, dev_msg: &str) -> Self {
        InterceptError(
            ErrorBuilder::new(codes::AUTH_UNAUTHENTICATED)
                .user_msg(user_msg)
                .dev_msg(dev_msg)
                .build(),
        )
    }

    /// Denial with the registry's default user message.
    pub fn forbidden_default() -> Self {
        InterceptError(ErrorBuilder::new(codes::AUTH_FORBIDDEN).build())
    }

    pub fn forbidden(msg: &str) -> Self {
        InterceptError(ErrorBuilder::new(codes::AUTH_FORBIDDEN).user_msg(msg).build())
    }

    pub fn validation(msg: &str) -> Self {
        InterceptError(
            ErrorBuilder::new(codes::VALIDATION_FAILED)
                .user_msg(msg)
                .build(),
        )
    }

    pub fn not_found(msg: &str) -> Self {
        InterceptError(
            ErrorBuilder::new(codes::RESOURCE_NOT_FOUND)
                .user_msg(msg)
                .build(),
        )
    }

    /// Fail-fast rejection while the breaker protects the downstream handler.
    pub fn service_unavailable() -> Self {
        InterceptError(ErrorBuilder::new(codes::SERVICE_UNAVAILABLE).build())
    }

    /// Recode an unrecognized downstream failure as 503, keeping the
    /// original as the cause.
    pub fn service_unavailable_from(original: ErrorObj) -> Self {
        InterceptError(
            ErrorBuilder::new(codes::SERVICE_UNAVAILABLE)
                .cause(CauseEntry {
                    code: original.code.0.to_string(),
                    summary: original
                        .message_dev
                        .unwrap_or(original.message_user),
                    meta: None,
                })
                .build(),
        )
    }
}

pub fn to_http_response(err: &InterceptError) -> (u16, serde_json::Value) {
    let obj = &err.0;
    let public = obj.to_public();
    (
        obj.http_status,
        serde_json::json!({
            "code": public.code,
            "message": public.message,
            "correlation_id": public.correlation_id
        }),
    )
}
