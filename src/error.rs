use crate::value::Kind;
use thiserror::Error;

/// Defines the set of errors that can occur within the `secret_type` library.
///
/// The first group of variants is the misuse taxonomy: each one signals that a
/// caller tried to use a sealed value in a way that would disclose it. They are
/// raised at the point of misuse and are never retried internally. The second
/// group covers failures of the native operation or of the sealing machinery.
#[derive(Error, Debug)]
pub enum SecretError {
    /// An attempt to examine a sealed value: printing, stringifying, converting
    /// to bytes or to a native number, or encoding it.
    #[error("Secrets cannot be examined")]
    Examination,

    /// A boolean derived from a sealed value was used to drive control flow.
    #[error("bools derived from Secrets cannot be used for control flow")]
    ControlFlow,

    /// A sealed value was used as a hash key or as a sequence index.
    #[error("Secrets cannot be used as keys")]
    KeyUsage,

    /// A float or complex conversion was requested from an integral-only number.
    #[error("Secrets cannot be used as non-integral numbers")]
    NumericDomain,

    /// A forwarded member does not exist on the native kind, or is not invokable.
    #[error("{kind} has no attribute {name}")]
    Attribute {
        /// The kind of the protected value the member was looked up on.
        kind: Kind,
        /// The requested member name.
        name: String,
    },

    /// `wrap` was handed a value outside the closed set of protectable kinds.
    #[error("Cannot wrap type '{0}'")]
    UnsupportedType(&'static str),

    /// A native conversion rejected the plaintext during a cast.
    #[error("Cannot cast {from} to {to}: {reason}")]
    Cast {
        /// Kind of the protected value.
        from: Kind,
        /// Requested target kind.
        to: Kind,
        /// Why the native conversion failed.
        reason: String,
    },

    /// The result of a forwarded call or of `apply_and_wrap` cannot be sealed.
    #[error("{operation} returned an unsealable {returned}")]
    NotImplemented {
        /// The attempted operation.
        operation: String,
        /// Name of the kind that was returned.
        returned: &'static str,
    },

    /// The native operation itself failed (operand mismatch, overflow,
    /// division by zero, bad arguments).
    #[error("{op} failed: {reason}")]
    Operation {
        /// Name of the operation.
        op: &'static str,
        /// Why it failed.
        reason: String,
    },

    /// A specific specialization was requested from a `Wrapped` holding another.
    #[error("expected a {expected} secret, found a {found} secret")]
    Variant {
        /// The specialization that was asked for.
        expected: &'static str,
        /// The specialization actually held.
        found: &'static str,
    },

    /// Sealing or opening the ciphertext failed.
    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),

    /// Serializing or deserializing the plaintext failed.
    #[error("Codec failure: {0}")]
    Codec(String),

    /// The system random source failed.
    #[error("Random generation failed: {0}")]
    Random(String),
}

impl SecretError {
    /// Returns `true` for errors that signal misuse of a sealed value, as opposed
    /// to a failure of the operation or of the sealing machinery.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            SecretError::Examination
                | SecretError::ControlFlow
                | SecretError::KeyUsage
                | SecretError::NumericDomain
                | SecretError::Attribute { .. }
        )
    }

    pub(crate) fn operation(op: &'static str, reason: impl Into<String>) -> Self {
        SecretError::Operation {
            op,
            reason: reason.into(),
        }
    }
}

/// A specialized `Result` type for `secret_type` operations.
pub type Result<T> = std::result::Result<T, SecretError>;
