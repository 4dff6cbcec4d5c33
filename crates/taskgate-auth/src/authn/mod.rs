use crate::errors::AuthError;
use crate::model::Principal;
use async_trait::async_trait;

pub mod jwt;

/// Credential-verification collaborator: turns a raw bearer token into a
/// Principal in a single verification attempt.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<Principal, AuthError>;
}
