use crate::compare::compare;
use crate::containers::{SecretBool, SecretNumber, SecretStr, Wrapped};
use crate::dispatch::{self, IntoSecret, Operand};
use crate::enclave::Enclave;
use crate::error::{Result, SecretError};
use crate::globals;
use crate::members;
use crate::native;
use crate::util::random_hex;
use crate::value::{Kind, Native, ProtectedValue};
use std::fmt;
use zeroize::Zeroizing;

/// The generic sealed container.
///
/// A `Secret` owns exactly one [`Enclave`]: an ephemeral key and the
/// ciphertext of one serialized [`ProtectedValue`]. The plaintext is never part
/// of its state. It is decrypted for the duration of a single operation and
/// wiped again before the operation returns. Containers are immutable; every
/// derived value is a new container.
///
/// Prefer [`Secret::wrap`], which picks the specialized container for the
/// value's kind. `Secret::new` always builds the generic one.
pub struct Secret {
    enclave: Enclave,
}

impl Secret {
    /// Seals `value` in a new generic container.
    ///
    /// # Errors
    ///
    /// * `SecretError::Random` - If key generation fails
    /// * `SecretError::Crypto` - If encryption fails
    pub fn new(value: impl Into<ProtectedValue>) -> Result<Self> {
        let value = Zeroizing::new(value.into());
        Self::seal(&value)
    }

    pub(crate) fn seal(value: &ProtectedValue) -> Result<Self> {
        Ok(Self {
            enclave: Enclave::seal(value)?,
        })
    }

    pub(crate) fn open(&self) -> Result<Zeroizing<ProtectedValue>> {
        self.enclave.open()
    }

    /// Wraps `value` in the specialized secret for its kind. See [`crate::wrap`].
    pub fn wrap<T: IntoSecret>(value: T) -> Result<Wrapped> {
        dispatch::wrap(value)
    }

    /// Returns the plaintext of `value`. See [`crate::unwrap`].
    pub fn unwrap<T: Operand + ?Sized>(value: &T) -> Result<Zeroizing<ProtectedValue>> {
        dispatch::unwrap(value)
    }

    /// Generates a random hex token of `length` characters directly inside a
    /// sealed container.
    ///
    /// # Example
    /// ```
    /// use secret_type::{Secret, Sealed};
    ///
    /// let token = Secret::token(32).unwrap();
    /// let length = token.reveal_scoped(|value| value.as_text().map(str::len)).unwrap();
    /// assert_eq!(length, Some(32));
    /// ```
    pub fn token(length: usize) -> Result<SecretStr> {
        let mut token = random_hex(length)?;
        let value = Zeroizing::new(ProtectedValue::Text(std::mem::take(&mut *token)));
        SecretStr::seal(&value)
    }

    /// Generates a token of the length configured by the active policy.
    pub fn default_token() -> Result<SecretStr> {
        Self::token(globals::policy().default_token_length)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hidden_debug(f, "Secret", self)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        refuse_display("Secret")
    }
}

/// Formats a container as `Name(kind, <hidden>)`.
pub(crate) fn hidden_debug(f: &mut fmt::Formatter<'_>, name: &str, secret: &Secret) -> fmt::Result {
    match secret.open() {
        Ok(value) => write!(f, "{}({}, <hidden>)", name, value.kind()),
        Err(_) => write!(f, "{}(<hidden>)", name),
    }
}

/// Display is an examination attempt; it always fails.
pub(crate) fn refuse_display(name: &str) -> fmt::Result {
    log::warn!("blocked attempt to display a {}", name);
    Err(fmt::Error)
}

fn blocked<T>(operation: &str, error: SecretError) -> Result<T> {
    log::warn!("blocked {} on a sealed value", operation);
    Err(error)
}

/// The contract shared by every sealed container.
///
/// The provided methods implement the generic behavior; the specialized
/// containers override the ones whose semantics differ for their kind.
/// Every method that derives a value returns it sealed.
pub trait Sealed {
    #[doc(hidden)]
    fn container(&self) -> &Secret;

    /// The kind of the sealed value. The value itself is not revealed.
    fn protected_type(&self) -> Result<Kind> {
        Ok(self.container().open()?.kind())
    }

    /// Converts the sealed value to `kind` and seals the result.
    ///
    /// # Errors
    ///
    /// * `SecretError::Cast` - If the native conversion rejects the plaintext
    fn cast(&self, kind: Kind) -> Result<Wrapped> {
        self.cast_with(kind, &[])
    }

    /// Like [`Sealed::cast`], passing `args` to the native conversion (a
    /// radix for integers, an encoding for text and bytes).
    fn cast_with(&self, kind: Kind, args: &[Native]) -> Result<Wrapped> {
        let plaintext = self.container().open()?;
        let converted = Zeroizing::new(native::cast(&plaintext, kind, args)?);
        dispatch::seal_value(&converted)
    }

    /// Calls `f` with the plaintext and discards what it returns.
    fn apply_and_discard<F, R>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&ProtectedValue) -> R,
    {
        let plaintext = self.container().open()?;
        let _ = f(&plaintext);
        Ok(())
    }

    /// Calls `f` with the plaintext and seals what it returns.
    ///
    /// # Errors
    ///
    /// * `SecretError::NotImplemented` - If the result cannot be sealed
    ///
    /// # Example
    /// ```
    /// use secret_type::{wrap, Sealed};
    ///
    /// let secret = wrap("hunter2").unwrap();
    /// let shouted = secret.apply_and_wrap(|value| value.as_text().unwrap_or_default().to_uppercase());
    /// assert!(shouted.is_ok());
    /// ```
    fn apply_and_wrap<F, R>(&self, f: F) -> Result<Wrapped>
    where
        F: FnOnce(&ProtectedValue) -> R,
        R: IntoSecret,
    {
        let plaintext = self.container().open()?;
        f(&plaintext)
            .into_secret()
            .map_err(|e| dispatch::unsealable("apply_and_wrap", e))
    }

    /// Exposes the plaintext to `f` for the duration of the call.
    ///
    /// The plaintext is wiped when `f` returns. Callers must not copy it out
    /// of the closure; nothing here can stop them from doing so.
    fn reveal_scoped<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&ProtectedValue) -> R,
    {
        let plaintext = self.container().open()?;
        Ok(f(&plaintext))
    }

    /// Constant-time equality; the result stays sealed.
    fn equals<O: Operand + ?Sized>(&self, other: &O) -> Result<SecretBool> {
        compare(self.container(), other)
    }

    /// Constant-time inequality; the result stays sealed.
    fn not_equals<O: Operand + ?Sized>(&self, other: &O) -> Result<SecretBool> {
        self.equals(other)?.flip()
    }

    /// The truthiness of the plaintext, sealed.
    fn truthy(&self) -> Result<SecretBool> {
        let plaintext = self.container().open()?;
        SecretBool::new(native::truthy(&plaintext))
    }

    fn to_text(&self) -> Result<String> {
        blocked("to_text", SecretError::Examination)
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        blocked("to_bytes", SecretError::Examination)
    }

    fn encode(&self, _encoding: &str) -> Result<Vec<u8>> {
        blocked("encode", SecretError::Examination)
    }

    /// Secrets are never usable as hash keys.
    fn hash_key(&self) -> Result<u64> {
        blocked("hash_key", SecretError::KeyUsage)
    }

    fn to_int(&self) -> Result<SecretNumber> {
        blocked("to_int", SecretError::Examination)
    }

    fn to_float(&self) -> Result<f64> {
        blocked("to_float", SecretError::Examination)
    }

    fn to_complex(&self) -> Result<(f64, f64)> {
        blocked("to_complex", SecretError::Examination)
    }

    /// Invokes the native member `name` on the plaintext and seals the result.
    ///
    /// # Errors
    ///
    /// * `SecretError::Attribute` - If the kind has no invokable member `name`
    /// * `SecretError::NotImplemented` - If the member returns an unsealable value
    fn forward_member(&self, name: &str, args: &[Native]) -> Result<Wrapped> {
        let plaintext = self.container().open()?;
        let result = members::invoke(&plaintext, name, args)?;
        result
            .into_secret()
            .map_err(|e| dispatch::unsealable(name, e))
    }
}

impl Sealed for Secret {
    fn container(&self) -> &Secret {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_holds_any_kind() {
        let secret = Secret::new(1.5).unwrap();
        assert_eq!(secret.protected_type().unwrap(), Kind::Float);

        let secret = Secret::new("text").unwrap();
        assert_eq!(secret.protected_type().unwrap(), Kind::Text);
    }

    #[test]
    fn test_examination_is_blocked() {
        let secret = Secret::new(2.5).unwrap();
        assert!(matches!(secret.to_text(), Err(SecretError::Examination)));
        assert!(matches!(secret.to_bytes(), Err(SecretError::Examination)));
        assert!(matches!(
            secret.encode("utf-8"),
            Err(SecretError::Examination)
        ));
        assert!(matches!(secret.to_int(), Err(SecretError::Examination)));
        assert!(matches!(secret.to_float(), Err(SecretError::Examination)));
        assert!(matches!(secret.to_complex(), Err(SecretError::Examination)));
        assert!(matches!(secret.hash_key(), Err(SecretError::KeyUsage)));

        let mut out = String::new();
        assert!(fmt::write(&mut out, format_args!("{}", secret)).is_err());
    }

    #[test]
    fn test_debug_hides_value() {
        let secret = Secret::new(2.5).unwrap();
        assert_eq!(format!("{:?}", secret), "Secret(float, <hidden>)");
    }

    #[test]
    fn test_escape_hatches() {
        let secret = Secret::new(2.5).unwrap();

        let mut seen = None;
        secret
            .apply_and_discard(|value| seen = value.as_float())
            .unwrap();
        assert_eq!(seen, Some(2.5));

        let doubled = secret
            .apply_and_wrap(|value| value.as_float().unwrap_or_default() * 2.0)
            .unwrap();
        assert_eq!(
            doubled.reveal_scoped(|value| value.as_float()).unwrap(),
            Some(5.0)
        );

        match secret.apply_and_wrap(|_| Native::List(vec![])) {
            Err(SecretError::NotImplemented {
                operation,
                returned,
            }) => {
                assert_eq!(operation, "apply_and_wrap");
                assert_eq!(returned, "list");
            }
            other => panic!("expected NotImplemented, got {:?}", other),
        }
    }

    #[test]
    fn test_truthy_is_sealed() {
        let zero = Secret::new(0.0).unwrap();
        let truthy = zero.truthy().unwrap();
        assert_eq!(truthy.reveal_scoped(|value| value.as_bool()).unwrap(), Some(false));
    }

    #[test]
    fn test_forward_member() {
        let secret = Secret::new(16.0).unwrap();
        let root = secret.forward_member("sqrt", &[]).unwrap();
        assert_eq!(root.reveal_scoped(|value| value.as_float()).unwrap(), Some(4.0));

        assert!(matches!(
            secret.forward_member("upper", &[]),
            Err(SecretError::Attribute { .. })
        ));
    }

    #[test]
    fn test_cast() {
        let secret = Secret::new(2.75).unwrap();
        let truncated = secret.cast(Kind::Integer).unwrap();
        assert_eq!(truncated.variant_name(), "number");
        assert_eq!(
            truncated.reveal_scoped(|value| value.as_integer()).unwrap(),
            Some(2)
        );
    }
}
