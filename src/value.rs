//! Plain value types: the closed set of protectable kinds and the open set of
//! native values that forwarded members and casts exchange.

use crate::error::{Result, SecretError};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

/// The kind of a [`ProtectedValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Text,
    Bytes,
    Bool,
    Integer,
    Float,
}

impl Kind {
    /// The native type name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Text => "str",
            Kind::Bytes => "bytes",
            Kind::Bool => "bool",
            Kind::Integer => "int",
            Kind::Float => "float",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A primitive value that may be sealed inside a secret.
///
/// This is a closed set; anything else is rejected by [`crate::wrap`]. The
/// type deliberately has no `Display` implementation. Plaintext copies handed
/// out by the library are always wrapped in `zeroize::Zeroizing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProtectedValue {
    Text(String),
    Bytes(Vec<u8>),
    Bool(bool),
    Integer(i128),
    Float(f64),
}

impl ProtectedValue {
    pub fn kind(&self) -> Kind {
        match self {
            ProtectedValue::Text(_) => Kind::Text,
            ProtectedValue::Bytes(_) => Kind::Bytes,
            ProtectedValue::Bool(_) => Kind::Bool,
            ProtectedValue::Integer(_) => Kind::Integer,
            ProtectedValue::Float(_) => Kind::Float,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ProtectedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ProtectedValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ProtectedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i128> {
        match self {
            ProtectedValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ProtectedValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl Zeroize for ProtectedValue {
    fn zeroize(&mut self) {
        match self {
            ProtectedValue::Text(s) => s.zeroize(),
            ProtectedValue::Bytes(b) => b.zeroize(),
            ProtectedValue::Bool(b) => b.zeroize(),
            ProtectedValue::Integer(i) => i.zeroize(),
            ProtectedValue::Float(f) => f.zeroize(),
        }
    }
}

macro_rules! protected_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ProtectedValue {
                fn from(value: $ty) -> Self {
                    ProtectedValue::$variant(value.into())
                }
            }
        )*
    };
}

protected_from! {
    String => Text,
    &str => Text,
    char => Text,
    Vec<u8> => Bytes,
    &[u8] => Bytes,
    bool => Bool,
    i8 => Integer,
    i16 => Integer,
    i32 => Integer,
    i64 => Integer,
    i128 => Integer,
    u8 => Integer,
    u16 => Integer,
    u32 => Integer,
    u64 => Integer,
    f32 => Float,
    f64 => Float,
}

impl From<usize> for ProtectedValue {
    fn from(value: usize) -> Self {
        ProtectedValue::Integer(value as i128)
    }
}

impl From<isize> for ProtectedValue {
    fn from(value: isize) -> Self {
        ProtectedValue::Integer(value as i128)
    }
}

/// A native value flowing in or out of a sealed operation.
///
/// Forwarded members, cast arguments and `apply_and_wrap` closures use this
/// open type. Only the variants that mirror [`ProtectedValue`] can be sealed.
#[derive(Debug, Clone, PartialEq)]
pub enum Native {
    Text(String),
    Bytes(Vec<u8>),
    Bool(bool),
    Integer(i128),
    Float(f64),
    List(Vec<Native>),
    None,
}

impl Native {
    /// The native type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Native::Text(_) => Kind::Text.name(),
            Native::Bytes(_) => Kind::Bytes.name(),
            Native::Bool(_) => Kind::Bool.name(),
            Native::Integer(_) => Kind::Integer.name(),
            Native::Float(_) => Kind::Float.name(),
            Native::List(_) => "list",
            Native::None => "none",
        }
    }

    /// Classifies this value into the protectable set.
    ///
    /// Booleans are matched before any numeric kind.
    pub fn classify(self) -> Result<ProtectedValue> {
        match self {
            Native::Text(s) => Ok(ProtectedValue::Text(s)),
            Native::Bytes(b) => Ok(ProtectedValue::Bytes(b)),
            Native::Bool(b) => Ok(ProtectedValue::Bool(b)),
            Native::Integer(i) => Ok(ProtectedValue::Integer(i)),
            Native::Float(f) => Ok(ProtectedValue::Float(f)),
            other => Err(SecretError::UnsupportedType(other.type_name())),
        }
    }
}

impl Zeroize for Native {
    fn zeroize(&mut self) {
        match self {
            Native::Text(s) => s.zeroize(),
            Native::Bytes(b) => b.zeroize(),
            Native::Bool(b) => b.zeroize(),
            Native::Integer(i) => i.zeroize(),
            Native::Float(f) => f.zeroize(),
            Native::List(items) => items.iter_mut().for_each(Zeroize::zeroize),
            Native::None => {}
        }
    }
}

impl From<ProtectedValue> for Native {
    fn from(value: ProtectedValue) -> Self {
        match value {
            ProtectedValue::Text(s) => Native::Text(s),
            ProtectedValue::Bytes(b) => Native::Bytes(b),
            ProtectedValue::Bool(b) => Native::Bool(b),
            ProtectedValue::Integer(i) => Native::Integer(i),
            ProtectedValue::Float(f) => Native::Float(f),
        }
    }
}

impl From<&str> for Native {
    fn from(value: &str) -> Self {
        Native::Text(value.to_owned())
    }
}

impl From<String> for Native {
    fn from(value: String) -> Self {
        Native::Text(value)
    }
}

impl From<Vec<u8>> for Native {
    fn from(value: Vec<u8>) -> Self {
        Native::Bytes(value)
    }
}

impl From<bool> for Native {
    fn from(value: bool) -> Self {
        Native::Bool(value)
    }
}

impl From<i128> for Native {
    fn from(value: i128) -> Self {
        Native::Integer(value)
    }
}

impl From<i32> for Native {
    fn from(value: i32) -> Self {
        Native::Integer(value.into())
    }
}

impl From<i64> for Native {
    fn from(value: i64) -> Self {
        Native::Integer(value.into())
    }
}

impl From<usize> for Native {
    fn from(value: usize) -> Self {
        Native::Integer(value as i128)
    }
}

impl From<f64> for Native {
    fn from(value: f64) -> Self {
        Native::Float(value)
    }
}

impl From<()> for Native {
    fn from(_: ()) -> Self {
        Native::None
    }
}

impl<T: Into<Native>> From<Option<T>> for Native {
    fn from(value: Option<T>) -> Self {
        value.map_or(Native::None, Into::into)
    }
}

impl From<Vec<Native>> for Native {
    fn from(value: Vec<Native>) -> Self {
        Native::List(value)
    }
}
