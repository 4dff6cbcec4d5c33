#[cfg(feature = "with-axum")]
pub mod http;
