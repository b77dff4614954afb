//! Process-global state for `secret_type`: the active [`SecretPolicy`].
//!
//! Containers never share state with each other; the policy is the only
//! cross-instance value and it is read-mostly.

use crate::policy::SecretPolicy;
use std::sync::{OnceLock, PoisonError, RwLock};

static POLICY: OnceLock<RwLock<SecretPolicy>> = OnceLock::new();

fn policy_lock() -> &'static RwLock<SecretPolicy> {
    POLICY.get_or_init(|| RwLock::new(SecretPolicy::default()))
}

/// Returns a copy of the active policy.
pub fn policy() -> SecretPolicy {
    policy_lock()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replaces the active policy.
pub fn set_policy(policy: SecretPolicy) {
    log::debug!("installing secret policy: {:?}", policy);
    *policy_lock()
        .write()
        .unwrap_or_else(PoisonError::into_inner) = policy;
}

/// Restores the default policy.
pub fn reset_policy() {
    set_policy(SecretPolicy::default());
}
