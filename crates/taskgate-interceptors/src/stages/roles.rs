use crate::context::{GuardContext, ProtoRequest, ProtoResponse};
use crate::errors::InterceptError;
use crate::stages::{Stage, StageOutcome};
use async_trait::async_trait;
use taskgate_auth::prelude::{Principal, Role};

/// Read-only role evaluation: an empty requirement always passes; otherwise
/// any single matching role suffices.
pub fn roles_allow(required: &[Role], principal: &Principal) -> bool {
    required.is_empty() || required.iter().any(|role| principal.has_role(*role))
}

pub struct RolesStage;

#[async_trait]
impl Stage for RolesStage {
    async fn handle(
        &self,
        cx: &mut GuardContext,
        _req: &mut dyn ProtoRequest,
        _rsp: &mut dyn ProtoResponse,
    ) -> Result<StageOutcome, InterceptError> {
        let Some(principal) = cx.principal.as_ref() else {
            return Err(InterceptError::unauthenticated(
                "Authentication token is missing",
                "role stage reached without a principal",
            ));
        };
        let Some(route) = cx.route.as_ref() else {
            return Err(InterceptError::internal("role stage reached without a bound route"));
        };

        if !roles_allow(&route.requirement.required_roles, principal) {
            return Err(InterceptError::forbidden_default());
        }
        Ok(StageOutcome::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_requirement_allows_anyone() {
        let principal = Principal::new(1, []);
        assert!(roles_allow(&[], &principal));
    }

    #[test]
    fn any_single_match_suffices() {
        let principal = Principal::new(1, [Role::User]);
        assert!(roles_allow(&[Role::Admin, Role::User], &principal));
    }

    #[test]
    fn disjoint_sets_deny() {
        let principal = Principal::new(1, [Role::User]);
        assert!(!roles_allow(&[Role::Admin], &principal));
    }

    #[test]
    fn empty_role_set_denied_by_nonempty_requirement() {
        let principal = Principal::new(1, []);
        assert!(!roles_allow(&[Role::Admin], &principal));
    }
}
