pub use crate::authn::{jwt::JwtAuthenticator, Authenticator};
pub use crate::errors::AuthError;
pub use crate::model::{Claims, Principal, Role};
