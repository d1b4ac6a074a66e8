use crate::claims::ClaimSet;
use crate::error::AuthError;

/// Checks that `claims` grant `required`.
///
/// Matching is exact and case-sensitive. A token without any permissions claim
/// is a configuration problem on the provider side and is reported as
/// `invalid_claims`, not as a missing grant.
pub fn check_permission(claims: &ClaimSet, required: &str) -> Result<(), AuthError> {
    let granted = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::PermissionsMissing)?;

    if granted.contains(required) {
        Ok(())
    } else {
        Err(AuthError::Unauthorized(required.to_string()))
    }
}
