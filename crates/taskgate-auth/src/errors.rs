use taskgate_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct AuthError(pub ErrorObj);

impl AuthError {
    pub fn into_inner(self) -> ErrorObj {
        self.0
    }
}

pub fn unauthenticated(user_msg: &str, dev_msg: &str) -> AuthError {
    AuthError(
        ErrorBuilder::new(codes::AUTH_UNAUTHENTICATED)
            .user_msg(user_msg)
            .dev_msg(dev_msg)
            .build(),
    )
}

pub fn forbidden(msg: &str) -> AuthError {
    AuthError(
        ErrorBuilder::new(codes::AUTH_FORBIDDEN)
            .user_msg(msg)
            .build(),
    )
}
