pub mod authn;
pub mod errors;
pub mod model;
pub mod prelude;
