use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use taskgate_auth::prelude::*;
use taskgate_interceptors::prelude::*;

pub const SECRET: &[u8] = b"test-secret";

pub fn token_for(sub: i64, roles: &[Role]) -> String {
    let exp = (chrono::Utc::now().timestamp() + 3600) as usize;
    let claims = Claims {
        sub,
        roles: roles.to_vec(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET),
    )
    .expect("encode token")
}

pub struct MockReq {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: serde_json::Value,
}

impl MockReq {
    pub fn get(path: &str) -> Self {
        Self {
            method: "GET".into(),
            path: path.into(),
            headers: HashMap::new(),
            body: serde_json::json!({}),
        }
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.headers
            .insert("Authorization".into(), format!("Bearer {token}"));
        self
    }

    pub fn raw_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

pub struct MockRes {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Option<serde_json::Value>,
}

impl MockRes {
    pub fn new() -> Self {
        Self {
            status: 0,
            headers: HashMap::new(),
            body: None,
        }
    }
}

#[async_trait]
impl ProtoRequest for MockReq {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers.get(name).cloned()
    }

    async fn read_json(&mut self) -> Result<serde_json::Value, InterceptError> {
        Ok(self.body.clone())
    }
}

#[async_trait]
impl ProtoResponse for MockRes {
    fn set_status(&mut self, code: u16) {
        self.status = code;
    }

    fn insert_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    async fn write_json(&mut self, body: &serde_json::Value) -> Result<(), InterceptError> {
        self.body = Some(body.clone());
        Ok(())
    }
}

/// In-memory stand-in for the persistence collaborator, with lookup
/// counters so tests can assert short-circuiting.
pub struct MemoryTasks {
    tasks: Vec<TaskRecord>,
    pub lookups: AtomicUsize,
}

impl MemoryTasks {
    pub fn with(tasks: &[(i64, i64)]) -> Arc<Self> {
        Arc::new(Self {
            tasks: tasks
                .iter()
                .map(|(id, owner)| TaskRecord {
                    id: *id,
                    owner: *owner,
                })
                .collect(),
            lookups: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TaskLookup for MemoryTasks {
    async fn task_by_id(&self, id: i64) -> Result<Option<TaskRecord>, InterceptError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn count_by_owner(&self, owner_id: i64) -> Result<u64, InterceptError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.tasks.iter().filter(|t| t.owner == owner_id).count() as u64)
    }

    async fn list_by_owner(
        &self,
        owner_id: i64,
        page: Page,
    ) -> Result<PageResult<TaskRecord>, InterceptError> {
        let owned: Vec<TaskRecord> = self
            .tasks
            .iter()
            .filter(|t| t.owner == owner_id)
            .cloned()
            .collect();
        let total = owned.len() as u64;
        let start = ((page.page.saturating_sub(1)) * page.limit) as usize;
        let items = owned
            .into_iter()
            .skip(start)
            .take(page.limit as usize)
            .collect();
        Ok(PageResult { items, total })
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<BreakerEvent>>,
}

impl BreakerSink for RecordingSink {
    fn transition(&self, event: BreakerEvent) {
        self.events.lock().push(event);
    }
}

/// The tasks/users surface of the backend, as wired at startup.
pub fn route_table(breaker_config: BreakerConfig) -> Arc<RouteTable> {
    Arc::new(
        RouteTable::builder(breaker_config)
            .scope_roles("/tasks", &[Role::Admin])
            .route(RouteSpec::new("GET", "/tasks"))
            .route(
                RouteSpec::new("GET", "/tasks/:task_id")
                    .roles(&[Role::User, Role::Admin])
                    .owner_guard(),
            )
            .route(
                RouteSpec::new("GET", "/tasks/user/:owner_id")
                    .roles(&[Role::User, Role::Admin])
                    .owner_guard(),
            )
            .route(
                RouteSpec::new("PATCH", "/tasks/:task_id")
                    .roles(&[Role::User, Role::Admin])
                    .owner_guard(),
            )
            .route(RouteSpec::new("DELETE", "/tasks/:task_id"))
            .route(RouteSpec::new("POST", "/tasks"))
            .route(RouteSpec::new("GET", "/users"))
            .build(),
    )
}

pub fn chain(table: Arc<RouteTable>, lookup: Arc<MemoryTasks>) -> GuardChain {
    GuardChain::new(vec![
        Box::new(ContextInitStage),
        Box::new(RouteBindStage { table }),
        Box::new(AuthnStage {
            authenticator: Box::new(JwtAuthenticator::new(SECRET)),
        }),
        Box::new(RolesStage),
        Box::new(OwnerStage { lookup }),
        Box::new(ResponseStampStage),
    ])
}
