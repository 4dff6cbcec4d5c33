pub use crate::breaker::{BreakerConfig, BreakerEvent, BreakerSink, CircuitBreaker, TracingSink};
pub use crate::context::{BoundRoute, GuardContext, ProtoRequest, ProtoResponse};
pub use crate::errors::{to_http_response, InterceptError};
pub use crate::lookup::{Page, PageResult, TaskLookup, TaskRecord};
pub use crate::routes::{RouteRequirement, RouteSpec, RouteTable, RouteTableBuilder};
pub use crate::stages::{
    authn::AuthnStage, context_init::ContextInitStage, owner::OwnerStage,
    response_stamp::ResponseStampStage, roles::roles_allow, roles::RolesStage,
    route_bind::RouteBindStage, GuardChain, Stage, StageOutcome,
};
