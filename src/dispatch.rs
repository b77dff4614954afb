//! Type-directed wrapping and unwrapping.
//!
//! [`wrap`] is the only place unsupported kinds are rejected. Specialization
//! is chosen once, from the kind of the plaintext: text and bytes become a
//! [`SecretStr`], booleans a [`SecretBool`], integers a [`SecretNumber`] and
//! everything else a plain [`Secret`]. Booleans are classified before any
//! numeric kind.

use crate::containers::{SecretBool, SecretNumber, SecretStr, Wrapped};
use crate::error::{Result, SecretError};
use crate::secret::{Sealed, Secret};
use crate::value::{Kind, Native, ProtectedValue};
use zeroize::Zeroizing;

/// Values that [`wrap`] accepts.
///
/// Already sealed values pass through unchanged, so wrapping is idempotent.
pub trait IntoSecret {
    fn into_secret(self) -> Result<Wrapped>;
}

/// Anything that can take part in an operation with a sealed value, sealed
/// or not.
pub trait Operand {
    /// Returns the plaintext of this operand, decrypting it if it is sealed.
    fn reveal_operand(&self) -> Result<Zeroizing<ProtectedValue>>;
}

/// Seals `value` in the container its kind selects.
pub(crate) fn seal_value(value: &ProtectedValue) -> Result<Wrapped> {
    let secret = Secret::seal(value)?;
    let wrapped = match value.kind() {
        Kind::Text | Kind::Bytes => Wrapped::Str(SecretStr::from_container(secret)),
        Kind::Bool => Wrapped::Bool(SecretBool::from_container(secret)),
        Kind::Integer => Wrapped::Number(SecretNumber::from_container(secret)),
        Kind::Float => Wrapped::Other(secret),
    };
    log::debug!(
        "dispatched {} value to a {} secret",
        value.kind(),
        wrapped.variant_name()
    );
    Ok(wrapped)
}

/// Wraps `value` in the specialized secret for its kind.
///
/// # Errors
///
/// * `SecretError::UnsupportedType` - If `value` is outside the protectable set
///
/// # Example
/// ```
/// use secret_type::wrap;
///
/// let secret = wrap("foobar123").unwrap();
/// assert!(secret.as_str().is_some());
///
/// // Wrapping a secret returns it unchanged.
/// let again = wrap(secret).unwrap();
/// assert!(again.as_str().is_some());
/// ```
pub fn wrap<T: IntoSecret>(value: T) -> Result<Wrapped> {
    value.into_secret()
}

/// Returns the plaintext of `value`.
///
/// Sealed values are decrypted; plain values are returned as they are.
pub fn unwrap<T: Operand + ?Sized>(value: &T) -> Result<Zeroizing<ProtectedValue>> {
    value.reveal_operand()
}

impl IntoSecret for ProtectedValue {
    fn into_secret(self) -> Result<Wrapped> {
        let value = Zeroizing::new(self);
        seal_value(&value)
    }
}

impl IntoSecret for Native {
    fn into_secret(self) -> Result<Wrapped> {
        self.classify()?.into_secret()
    }
}

impl Operand for ProtectedValue {
    fn reveal_operand(&self) -> Result<Zeroizing<ProtectedValue>> {
        Ok(Zeroizing::new(self.clone()))
    }
}

impl Operand for Native {
    fn reveal_operand(&self) -> Result<Zeroizing<ProtectedValue>> {
        self.clone().classify().map(Zeroizing::new)
    }
}

impl<T: Operand + ?Sized> Operand for &T {
    fn reveal_operand(&self) -> Result<Zeroizing<ProtectedValue>> {
        (**self).reveal_operand()
    }
}

impl Operand for str {
    fn reveal_operand(&self) -> Result<Zeroizing<ProtectedValue>> {
        Ok(Zeroizing::new(ProtectedValue::Text(self.to_owned())))
    }
}

impl Operand for [u8] {
    fn reveal_operand(&self) -> Result<Zeroizing<ProtectedValue>> {
        Ok(Zeroizing::new(ProtectedValue::Bytes(self.to_vec())))
    }
}

macro_rules! plain_operand {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoSecret for $ty {
                fn into_secret(self) -> Result<Wrapped> {
                    ProtectedValue::from(self).into_secret()
                }
            }

            impl Operand for $ty {
                fn reveal_operand(&self) -> Result<Zeroizing<ProtectedValue>> {
                    Ok(Zeroizing::new(ProtectedValue::from(self.clone())))
                }
            }
        )*
    };
}

plain_operand!(
    String, char, Vec<u8>, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize, f32,
    f64,
);

impl IntoSecret for &str {
    fn into_secret(self) -> Result<Wrapped> {
        ProtectedValue::from(self).into_secret()
    }
}

impl IntoSecret for &[u8] {
    fn into_secret(self) -> Result<Wrapped> {
        ProtectedValue::from(self).into_secret()
    }
}

impl IntoSecret for Wrapped {
    fn into_secret(self) -> Result<Wrapped> {
        Ok(self)
    }
}

impl Operand for Wrapped {
    fn reveal_operand(&self) -> Result<Zeroizing<ProtectedValue>> {
        self.container().open()
    }
}

macro_rules! sealed_passthrough {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl IntoSecret for $ty {
                fn into_secret(self) -> Result<Wrapped> {
                    Ok(Wrapped::$variant(self))
                }
            }

            impl Operand for $ty {
                fn reveal_operand(&self) -> Result<Zeroizing<ProtectedValue>> {
                    self.container().open()
                }
            }
        )*
    };
}

sealed_passthrough! {
    Secret => Other,
    SecretStr => Str,
    SecretBool => Bool,
    SecretNumber => Number,
}

/// Maps an unsealable result to the error naming the attempted operation.
pub(crate) fn unsealable(operation: &str, error: SecretError) -> SecretError {
    match error {
        SecretError::UnsupportedType(returned) => SecretError::NotImplemented {
            operation: operation.to_owned(),
            returned,
        },
        other => other,
    }
}
