/// Default values for SecretPolicy
pub const DEFAULT_DECOY_UPPER_BOUND: usize = 10_000;
pub const DEFAULT_TOKEN_LENGTH: usize = 64;

/// How a string-like secret answers a plain `len()` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthPolicy {
    /// Report a random length in `0..upper_bound` so that the size of the
    /// secret cannot be inferred. This breaks ordinary collection expectations.
    Decoy { upper_bound: usize },

    /// Report the true length.
    Exact,
}

impl Default for LengthPolicy {
    fn default() -> Self {
        LengthPolicy::Decoy {
            upper_bound: DEFAULT_DECOY_UPPER_BOUND,
        }
    }
}

/// Process-wide behaviour knobs for secrets.
///
/// Install one with [`crate::set_policy`]; read the active one with
/// [`crate::policy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretPolicy {
    /// What `SecretStr::len` reports
    pub length_policy: LengthPolicy,

    /// Token length used by `Secret::default_token`
    pub default_token_length: usize,
}

impl Default for SecretPolicy {
    fn default() -> Self {
        Self {
            length_policy: LengthPolicy::default(),
            default_token_length: DEFAULT_TOKEN_LENGTH,
        }
    }
}

impl SecretPolicy {
    /// Creates a new SecretPolicy with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the length policy
    ///
    /// # Example
    /// ```
    /// use secret_type::{LengthPolicy, SecretPolicy};
    ///
    /// let policy = SecretPolicy::new().with_length_policy(LengthPolicy::Exact);
    /// assert_eq!(policy.length_policy, LengthPolicy::Exact);
    /// ```
    pub fn with_length_policy(mut self, length_policy: LengthPolicy) -> Self {
        self.length_policy = length_policy;
        self
    }

    /// Sets the default token length
    pub fn with_default_token_length(mut self, length: usize) -> Self {
        self.default_token_length = length;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = SecretPolicy::new();
        assert_eq!(
            policy.length_policy,
            LengthPolicy::Decoy {
                upper_bound: DEFAULT_DECOY_UPPER_BOUND
            }
        );
        assert_eq!(policy.default_token_length, DEFAULT_TOKEN_LENGTH);
    }

    #[test]
    fn test_builders() {
        let policy = SecretPolicy::new()
            .with_length_policy(LengthPolicy::Decoy { upper_bound: 16 })
            .with_default_token_length(12);
        assert_eq!(policy.length_policy, LengthPolicy::Decoy { upper_bound: 16 });
        assert_eq!(policy.default_token_length, 12);
    }
}
