pub use crate::{
    code::{codes, spec_of, CodeSpec, ErrorCode, REGISTRY},
    kind::ErrorKind,
    labels::labels,
    model::{AuditErrorView, CauseEntry, ErrorBuilder, ErrorObj, PublicErrorView},
    retry::RetryClass,
    severity::Severity,
};
