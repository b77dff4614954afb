use crate::containers::Wrapped;
use crate::dispatch;
use crate::error::{Result, SecretError};
use crate::native;
use crate::secret::{hidden_debug, refuse_display, Sealed, Secret};
use crate::value::{Kind, Native, ProtectedValue};
use std::fmt;
use zeroize::Zeroizing;

/// A sealed integer.
///
/// Carries the full integer operator surface (see the `ops` impls and the
/// generated named methods). Conversion to an integer stays sealed; floating
/// point conversions fail with [`SecretError::NumericDomain`] and use as an
/// index fails with [`SecretError::KeyUsage`].
pub struct SecretNumber(Secret);

impl SecretNumber {
    /// Seals `value`.
    pub fn new(value: impl Into<i128>) -> Result<Self> {
        Secret::seal(&ProtectedValue::Integer(value.into())).map(Self)
    }

    pub(crate) fn from_container(secret: Secret) -> Self {
        Self(secret)
    }

    /// Secrets are never usable as sequence indices.
    pub fn as_index(&self) -> Result<usize> {
        log::warn!("blocked use of a sealed number as an index");
        Err(SecretError::KeyUsage)
    }
}

impl Sealed for SecretNumber {
    fn container(&self) -> &Secret {
        &self.0
    }

    fn cast_with(&self, kind: Kind, args: &[Native]) -> Result<Wrapped> {
        if kind == Kind::Float {
            log::warn!("blocked float cast of a sealed number");
            return Err(SecretError::NumericDomain);
        }
        let plaintext = self.0.open()?;
        let converted = Zeroizing::new(native::cast(&plaintext, kind, args)?);
        dispatch::seal_value(&converted)
    }

    fn to_int(&self) -> Result<SecretNumber> {
        let plaintext = self.0.open()?;
        let converted = Zeroizing::new(native::cast(&plaintext, Kind::Integer, &[])?);
        Secret::seal(&converted).map(SecretNumber)
    }

    fn to_float(&self) -> Result<f64> {
        log::warn!("blocked float conversion of a sealed number");
        Err(SecretError::NumericDomain)
    }

    fn to_complex(&self) -> Result<(f64, f64)> {
        log::warn!("blocked complex conversion of a sealed number");
        Err(SecretError::NumericDomain)
    }
}

impl fmt::Display for SecretNumber {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        refuse_display("SecretNumber")
    }
}

impl fmt::Debug for SecretNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hidden_debug(f, "SecretNumber", &self.0)
    }
}
