pub mod adapters;
pub mod breaker;
pub mod context;
pub mod errors;
pub mod lookup;
pub mod prelude;
pub mod routes;
pub mod stages;

pub use stages::{GuardChain, Stage, StageOutcome};
