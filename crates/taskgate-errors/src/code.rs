use crate::{kind::ErrorKind, retry::RetryClass, severity::Severity};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ErrorCode(pub &'static str);

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ErrorCode(Box::leak(s.into_boxed_str())))
    }
}

#[derive(Clone, Debug)]
pub struct CodeSpec {
    pub code: ErrorCode,
    pub kind: ErrorKind,
    pub http_status: u16,
    pub retryable: RetryClass,
    pub severity: Severity,
    pub default_user_msg: &'static str,
}

pub mod codes {
    use super::ErrorCode;

    pub const AUTH_UNAUTHENTICATED: ErrorCode = ErrorCode("AUTH.UNAUTHENTICATED");
    pub const AUTH_FORBIDDEN: ErrorCode = ErrorCode("AUTH.FORBIDDEN");
    pub const VALIDATION_FAILED: ErrorCode = ErrorCode("VALIDATION.FAILED");
    pub const RESOURCE_NOT_FOUND: ErrorCode = ErrorCode("RESOURCE.NOT_FOUND");
    pub const SERVICE_UNAVAILABLE: ErrorCode = ErrorCode("SERVICE.UNAVAILABLE");
    pub const UPSTREAM_TIMEOUT: ErrorCode = ErrorCode("UPSTREAM.TIMEOUT");
    pub const UNKNOWN_INTERNAL: ErrorCode = ErrorCode("UNKNOWN.INTERNAL");
}

pub static REGISTRY: Lazy<HashMap<&'static str, CodeSpec>> = Lazy::new(|| {
    use codes::*;

    let mut map = HashMap::new();
    let mut add = |spec: CodeSpec| {
        let key = spec.code.0;
        if map.insert(key, spec).is_some() {
            panic!("duplicate error code: {}", key);
        }
    };

    add(CodeSpec {
        code: AUTH_UNAUTHENTICATED,
        kind: ErrorKind::Auth,
        http_status: 401,
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "Please sign in.",
    });

    add(CodeSpec {
        code: AUTH_FORBIDDEN,
        kind: ErrorKind::Auth,
        http_status: 403,
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "You don't have permission to perform this action.",
    });

    add(CodeSpec {
        code: VALIDATION_FAILED,
        kind: ErrorKind::Validation,
        http_status: 400,
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "Your request is invalid. Please check inputs.",
    });

    add(CodeSpec {
        code: RESOURCE_NOT_FOUND,
        kind: ErrorKind::NotFound,
        http_status: 404,
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "Resource not found.",
    });

    add(CodeSpec {
        code: SERVICE_UNAVAILABLE,
        kind: ErrorKind::Unavailable,
        http_status: 503,
        retryable: RetryClass::Transient,
        severity: Severity::Error,
        default_user_msg: "Service is currently unavailable",
    });

    add(CodeSpec {
        code: UPSTREAM_TIMEOUT,
        kind: ErrorKind::Timeout,
        http_status: 504,
        retryable: RetryClass::Transient,
        severity: Severity::Error,
        default_user_msg: "Upstream call timed out. Please retry later.",
    });

    add(CodeSpec {
        code: UNKNOWN_INTERNAL,
        kind: ErrorKind::Internal,
        http_status: 500,
        retryable: RetryClass::Transient,
        severity: Severity::Error,
        default_user_msg: "Internal error. Please retry later.",
    });

    map
});

pub fn spec_of(code: ErrorCode) -> &'static CodeSpec {
    REGISTRY.get(code.0).expect("unregistered ErrorCode")
}
