use crate::containers::{SecretBool, SecretNumber, SecretStr};
use crate::error::{Result, SecretError};
use crate::secret::{Sealed, Secret};
use crate::value::{Kind, Native};
use std::fmt;

/// A sealed value in whichever container its kind selected.
///
/// This is what [`crate::wrap`] and every derived operation return. It
/// implements [`Sealed`] by delegating to the container it holds, so the
/// specialized behavior of that container is preserved.
pub enum Wrapped {
    Str(SecretStr),
    Bool(SecretBool),
    Number(SecretNumber),
    Other(Secret),
}

macro_rules! delegate {
    ($self:ident, $inner:ident => $body:expr) => {
        match $self {
            Wrapped::Str($inner) => $body,
            Wrapped::Bool($inner) => $body,
            Wrapped::Number($inner) => $body,
            Wrapped::Other($inner) => $body,
        }
    };
}

impl Wrapped {
    /// Short name of the container held.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Wrapped::Str(_) => "str",
            Wrapped::Bool(_) => "bool",
            Wrapped::Number(_) => "number",
            Wrapped::Other(_) => "secret",
        }
    }

    pub fn as_str(&self) -> Option<&SecretStr> {
        match self {
            Wrapped::Str(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<&SecretBool> {
        match self {
            Wrapped::Bool(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&SecretNumber> {
        match self {
            Wrapped::Number(inner) => Some(inner),
            _ => None,
        }
    }

    fn mismatch(&self, expected: &'static str) -> SecretError {
        SecretError::Variant {
            expected,
            found: self.variant_name(),
        }
    }

    /// # Errors
    ///
    /// * `SecretError::Variant` - If another container is held
    pub fn into_str(self) -> Result<SecretStr> {
        match self {
            Wrapped::Str(inner) => Ok(inner),
            other => Err(other.mismatch("str")),
        }
    }

    /// # Errors
    ///
    /// * `SecretError::Variant` - If another container is held
    pub fn into_bool(self) -> Result<SecretBool> {
        match self {
            Wrapped::Bool(inner) => Ok(inner),
            other => Err(other.mismatch("bool")),
        }
    }

    /// # Errors
    ///
    /// * `SecretError::Variant` - If another container is held
    pub fn into_number(self) -> Result<SecretNumber> {
        match self {
            Wrapped::Number(inner) => Ok(inner),
            other => Err(other.mismatch("number")),
        }
    }
}

impl Sealed for Wrapped {
    fn container(&self) -> &Secret {
        delegate!(self, inner => inner.container())
    }

    fn cast_with(&self, kind: Kind, args: &[Native]) -> Result<Wrapped> {
        delegate!(self, inner => inner.cast_with(kind, args))
    }

    fn truthy(&self) -> Result<SecretBool> {
        delegate!(self, inner => inner.truthy())
    }

    fn to_text(&self) -> Result<String> {
        delegate!(self, inner => inner.to_text())
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        delegate!(self, inner => inner.to_bytes())
    }

    fn encode(&self, encoding: &str) -> Result<Vec<u8>> {
        delegate!(self, inner => inner.encode(encoding))
    }

    fn hash_key(&self) -> Result<u64> {
        delegate!(self, inner => inner.hash_key())
    }

    fn to_int(&self) -> Result<SecretNumber> {
        delegate!(self, inner => inner.to_int())
    }

    fn to_float(&self) -> Result<f64> {
        delegate!(self, inner => inner.to_float())
    }

    fn to_complex(&self) -> Result<(f64, f64)> {
        delegate!(self, inner => inner.to_complex())
    }
}

impl fmt::Display for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        delegate!(self, inner => fmt::Display::fmt(inner, f))
    }
}

impl fmt::Debug for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        delegate!(self, inner => fmt::Debug::fmt(inner, f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::wrap;

    #[test]
    fn test_into_variant() {
        assert!(wrap("x").unwrap().into_str().is_ok());
        assert!(wrap(true).unwrap().into_bool().is_ok());
        assert!(wrap(1).unwrap().into_number().is_ok());

        match wrap(1).unwrap().into_str() {
            Err(SecretError::Variant { expected, found }) => {
                assert_eq!(expected, "str");
                assert_eq!(found, "number");
            }
            other => panic!("expected a variant error, got {:?}", other),
        }
    }

    #[test]
    fn test_specialized_behavior_is_kept() {
        let flag = wrap(true).unwrap();
        assert!(matches!(flag.truthy(), Err(SecretError::ControlFlow)));
        assert_eq!(flag.to_text().unwrap(), "true");
        assert_eq!(flag.to_string(), "true");

        let number = wrap(3).unwrap();
        assert!(matches!(
            number.cast(Kind::Float),
            Err(SecretError::NumericDomain)
        ));

        let text = wrap("abc").unwrap();
        assert!(matches!(text.to_text(), Err(SecretError::Examination)));
        assert_eq!(format!("{:?}", text), "SecretStr(str, <hidden>)");
    }
}
