use super::Authenticator;
use crate::errors::{self, AuthError};
use crate::model::{Claims, Principal};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

/// HS256 verifier against a shared secret. Validates signature and expiry.
pub struct JwtAuthenticator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

#[async_trait::async_trait]
impl Authenticator for JwtAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                errors::unauthenticated(
                    "Authentication token is invalid",
                    &format!("jwt verify: {e}"),
                )
            })?;
        Ok(data.claims.into())
    }
}
