use crate::breaker::CircuitBreaker;
use crate::routes::RouteRequirement;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use taskgate_auth::prelude::Principal;

/// Request-scoped state shared by the guard stages. Created once per
/// inbound request and discarded at response time.
#[derive(Clone, Default)]
pub struct GuardContext {
    pub request_id: String,
    pub principal: Option<Principal>,
    pub route: Option<BoundRoute>,
}

/// The route a request resolved to: its static admission requirement, the
/// captured path parameters and the breaker guarding its handler.
#[derive(Clone)]
pub struct BoundRoute {
    pub key: String,
    pub requirement: RouteRequirement,
    pub params: HashMap<String, String>,
    pub breaker: Arc<CircuitBreaker>,
}

impl BoundRoute {
    pub fn param_i64(&self, name: &str) -> Option<i64> {
        self.params.get(name).and_then(|raw| raw.parse().ok())
    }
}

#[async_trait]
pub trait ProtoRequest: Send {
    fn method(&self) -> &str;
    fn path(&self) -> &str;
    fn header(&self, name: &str) -> Option<String>;
    async fn read_json(&mut self) -> Result<serde_json::Value, crate::errors::InterceptError>;
}

#[async_trait]
pub trait ProtoResponse: Send {
    fn set_status(&mut self, code: u16);
    fn insert_header(&mut self, name: &str, value: &str);
    async fn write_json(
        &mut self,
        body: &serde_json::Value,
    ) -> Result<(), crate::errors::InterceptError>;
}
