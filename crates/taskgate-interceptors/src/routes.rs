use crate::breaker::{BreakerConfig, BreakerSink, CircuitBreaker, TracingSink};
use crate::context::BoundRoute;
use std::collections::HashMap;
use std::sync::Arc;
use taskgate_auth::prelude::Role;

/// Static admission metadata for one route, resolved at registration time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteRequirement {
    /// Empty means no role restriction at the role stage. A principal
    /// passes if it holds ANY of the listed roles.
    pub required_roles: Vec<Role>,
    pub owner_guard: bool,
}

#[derive(Clone, Debug)]
pub struct RouteSpec {
    method: String,
    pattern: String,
    required_roles: Option<Vec<Role>>,
    owner_guard: bool,
}

impl RouteSpec {
    pub fn new(method: &str, pattern: &str) -> Self {
        Self {
            method: method.to_string(),
            pattern: pattern.to_string(),
            required_roles: None,
            owner_guard: false,
        }
    }

    /// Route-level roles; overrides the scope default.
    pub fn roles(mut self, roles: &[Role]) -> Self {
        self.required_roles = Some(roles.to_vec());
        self
    }

    pub fn owner_guard(mut self) -> Self {
        self.owner_guard = true;
        self
    }
}

struct RouteEntry {
    spec: RouteSpec,
    breaker: Arc<CircuitBreaker>,
}

/// Per-route declaration table consulted by the pipeline. Built once at
/// wiring time, read-only thereafter. Every route owns its breaker, so a
/// failing handler trips only its own route.
pub struct RouteTable {
    scope_roles: Vec<(String, Vec<Role>)>,
    routes: Vec<RouteEntry>,
}

pub struct RouteTableBuilder {
    breaker_config: BreakerConfig,
    sink: Arc<dyn BreakerSink>,
    scope_roles: Vec<(String, Vec<Role>)>,
    routes: Vec<RouteEntry>,
}

impl RouteTableBuilder {
    pub fn new(breaker_config: BreakerConfig) -> Self {
        Self {
            breaker_config,
            sink: Arc::new(TracingSink),
            scope_roles: Vec::new(),
            routes: Vec::new(),
        }
    }

    pub fn breaker_sink(mut self, sink: Arc<dyn BreakerSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Default roles for every route under `prefix`, unless the route
    /// declares its own.
    pub fn scope_roles(mut self, prefix: &str, roles: &[Role]) -> Self {
        self.scope_roles.push((prefix.to_string(), roles.to_vec()));
        self
    }

    pub fn route(mut self, spec: RouteSpec) -> Self {
        let breaker = Arc::new(CircuitBreaker::new(self.breaker_config, self.sink.clone()));
        self.routes.push(RouteEntry { spec, breaker });
        self
    }

    pub fn build(self) -> RouteTable {
        RouteTable {
            scope_roles: self.scope_roles,
            routes: self.routes,
        }
    }
}

impl RouteTable {
    pub fn builder(breaker_config: BreakerConfig) -> RouteTableBuilder {
        RouteTableBuilder::new(breaker_config)
    }

    pub fn match_http(&self, method: &str, path: &str) -> Option<BoundRoute> {
        for entry in &self.routes {
            if !entry.spec.method.eq_ignore_ascii_case(method) {
                continue;
            }
            let Some(params) = match_pattern(&entry.spec.pattern, path) else {
                continue;
            };
            let required_roles = entry
                .spec
                .required_roles
                .clone()
                .or_else(|| self.scope_default(&entry.spec.pattern))
                .unwrap_or_default();
            return Some(BoundRoute {
                key: format!("{} {}", entry.spec.method, entry.spec.pattern),
                requirement: RouteRequirement {
                    required_roles,
                    owner_guard: entry.spec.owner_guard,
                },
                params,
                breaker: entry.breaker.clone(),
            });
        }
        None
    }

    fn scope_default(&self, pattern: &str) -> Option<Vec<Role>> {
        // Longest matching prefix wins.
        self.scope_roles
            .iter()
            .filter(|(prefix, _)| pattern.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, roles)| roles.clone())
    }
}

/// Literal segments must match exactly; `:name` segments capture the path
/// segment under `name`.
fn match_pattern(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
    let pattern_segs: Vec<&str> = pattern.trim_matches('/').split('/').collect();
    let path_segs: Vec<&str> = path.trim_matches('/').split('/').collect();
    if pattern_segs.len() != path_segs.len() {
        return None;
    }

    let mut params = HashMap::new();
    for (pat, seg) in pattern_segs.iter().zip(path_segs.iter()) {
        if let Some(name) = pat.strip_prefix(':') {
            if seg.is_empty() {
                return None;
            }
            params.insert(name.to_string(), (*seg).to_string());
        } else if pat != seg {
            return None;
        }
    }
    Some(params)
}
