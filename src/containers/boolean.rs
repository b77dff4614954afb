use crate::error::{Result, SecretError};
use crate::native;
use crate::secret::{hidden_debug, Sealed, Secret};
use crate::value::ProtectedValue;
use std::fmt;
use std::ops::Not;

/// A sealed boolean.
///
/// Every boolean derived from a secret is one of these. It cannot drive
/// control flow: [`Sealed::truthy`] and conversion to `bool` fail with
/// [`SecretError::ControlFlow`]. Its textual form ("true" or "false") is the
/// one thing that may be displayed.
pub struct SecretBool(Secret);

impl SecretBool {
    /// Seals `value`.
    pub fn new(value: bool) -> Result<Self> {
        Secret::seal(&ProtectedValue::Bool(value)).map(Self)
    }

    pub(crate) fn from_container(secret: Secret) -> Self {
        Self(secret)
    }

    /// Negates the sealed value without revealing it.
    pub fn flip(&self) -> Result<SecretBool> {
        let plaintext = self.0.open()?;
        match *plaintext {
            ProtectedValue::Bool(value) => SecretBool::new(!value),
            ref other => SecretBool::new(!native::truthy(other)),
        }
    }

    fn literal(&self) -> Result<&'static str> {
        let plaintext = self.0.open()?;
        Ok(if native::truthy(&plaintext) {
            "true"
        } else {
            "false"
        })
    }
}

impl Sealed for SecretBool {
    fn container(&self) -> &Secret {
        &self.0
    }

    fn truthy(&self) -> Result<SecretBool> {
        log::warn!("blocked control flow on a sealed bool");
        Err(SecretError::ControlFlow)
    }

    fn to_text(&self) -> Result<String> {
        self.literal().map(str::to_owned)
    }
}

impl TryFrom<&SecretBool> for bool {
    type Error = SecretError;

    fn try_from(_: &SecretBool) -> Result<Self> {
        log::warn!("blocked control flow on a sealed bool");
        Err(SecretError::ControlFlow)
    }
}

impl TryFrom<SecretBool> for bool {
    type Error = SecretError;

    fn try_from(value: SecretBool) -> Result<Self> {
        bool::try_from(&value)
    }
}

impl Not for &SecretBool {
    type Output = Result<SecretBool>;

    fn not(self) -> Self::Output {
        self.flip()
    }
}

impl Not for SecretBool {
    type Output = Result<SecretBool>;

    fn not(self) -> Self::Output {
        self.flip()
    }
}

impl fmt::Display for SecretBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal().map_err(|_| fmt::Error)?)
    }
}

impl fmt::Debug for SecretBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.literal() {
            Ok(literal) => write!(f, "SecretBool({})", literal),
            Err(_) => hidden_debug(f, "SecretBool", &self.0),
        }
    }
}
