use crate::containers::{SecretBool, SecretNumber, Wrapped};
use crate::dispatch::{self, Operand};
use crate::error::{Result, SecretError};
use crate::globals;
use crate::native;
use crate::policy::LengthPolicy;
use crate::secret::{hidden_debug, refuse_display, Sealed, Secret};
use crate::util::decoy_length;
use crate::value::{Kind, Native, ProtectedValue};
use std::fmt;
use std::ops::{Bound, RangeBounds};
use zeroize::Zeroizing;

/// A sealed string or byte sequence.
///
/// Implements a read-only sequence surface (length, indexing, slicing,
/// membership, iteration, reversal) in which every element handed back is
/// sealed again. Text is indexed by `char`; bytes are indexed by byte and
/// their elements are integers.
pub struct SecretStr(Secret);

impl SecretStr {
    /// Seals a string.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = Zeroizing::new(ProtectedValue::Text(value.into()));
        Self::seal(&value)
    }

    /// Seals a byte sequence.
    pub fn from_bytes(value: impl Into<Vec<u8>>) -> Result<Self> {
        let value = Zeroizing::new(ProtectedValue::Bytes(value.into()));
        Self::seal(&value)
    }

    pub(crate) fn seal(value: &ProtectedValue) -> Result<Self> {
        Secret::seal(value).map(Self)
    }

    pub(crate) fn from_container(secret: Secret) -> Self {
        Self(secret)
    }

    fn seal_str(value: ProtectedValue) -> Result<Self> {
        let value = Zeroizing::new(value);
        Self::seal(&value)
    }

    fn sequence_error(op: &'static str, value: &ProtectedValue) -> SecretError {
        SecretError::operation(op, format!("{} is not a sequence", value.kind()))
    }

    /// The length as reported under the active [`LengthPolicy`].
    ///
    /// With the default decoy policy this is a random number and says nothing
    /// about the secret. Use [`SecretStr::sealed_len`] for the real length.
    pub fn len(&self) -> Result<usize> {
        match globals::policy().length_policy {
            LengthPolicy::Decoy { upper_bound } => Ok(decoy_length(upper_bound)),
            LengthPolicy::Exact => {
                let plaintext = self.0.open()?;
                element_count(&plaintext).ok_or_else(|| Self::sequence_error("len", &plaintext))
            }
        }
    }

    /// The real length (characters for text, bytes for bytes), sealed.
    pub fn sealed_len(&self) -> Result<SecretNumber> {
        let plaintext = self.0.open()?;
        let count = element_count(&plaintext)
            .ok_or_else(|| Self::sequence_error("sealed_len", &plaintext))?;
        SecretNumber::new(count as i128)
    }

    /// Whether the sequence is empty, sealed.
    pub fn is_empty(&self) -> Result<SecretBool> {
        let plaintext = self.0.open()?;
        SecretBool::new(!native::truthy(&plaintext))
    }

    /// The element at `index`, sealed.
    ///
    /// # Errors
    ///
    /// * `SecretError::Operation` - If `index` is out of range
    pub fn index_at(&self, index: usize) -> Result<Wrapped> {
        let plaintext = self.0.open()?;
        let element = match &*plaintext {
            ProtectedValue::Text(s) => s
                .chars()
                .nth(index)
                .map(|c| ProtectedValue::Text(c.to_string())),
            ProtectedValue::Bytes(b) => b
                .get(index)
                .map(|byte| ProtectedValue::Integer(i128::from(*byte))),
            other => return Err(Self::sequence_error("index_at", other)),
        };
        let element = Zeroizing::new(
            element.ok_or_else(|| SecretError::operation("index_at", "index out of range"))?,
        );
        dispatch::seal_value(&element)
    }

    /// A sub-sequence, sealed. Bounds past the end are clamped.
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> Result<SecretStr> {
        let plaintext = self.0.open()?;
        match &*plaintext {
            ProtectedValue::Text(s) => {
                let (start, end) = clamp(&range, s.chars().count());
                Self::seal_str(ProtectedValue::Text(
                    s.chars().skip(start).take(end - start).collect(),
                ))
            }
            ProtectedValue::Bytes(b) => {
                let (start, end) = clamp(&range, b.len());
                Self::seal_str(ProtectedValue::Bytes(b[start..end].to_vec()))
            }
            other => Err(Self::sequence_error("slice", other)),
        }
    }

    /// Membership test, sealed.
    ///
    /// Text looks for a substring. Bytes accept either a byte sequence to
    /// search for or a single byte value.
    pub fn contains<O: Operand + ?Sized>(&self, item: &O) -> Result<SecretBool> {
        let plaintext = self.0.open()?;
        let item = item.reveal_operand()?;
        let found = match (&*plaintext, &*item) {
            (ProtectedValue::Text(haystack), ProtectedValue::Text(needle)) => {
                haystack.contains(needle.as_str())
            }
            (ProtectedValue::Bytes(haystack), ProtectedValue::Bytes(needle)) => {
                needle.is_empty()
                    || haystack
                        .windows(needle.len())
                        .any(|window| window == needle.as_slice())
            }
            (ProtectedValue::Bytes(haystack), ProtectedValue::Integer(byte)) => {
                let byte = u8::try_from(*byte).map_err(|_| {
                    SecretError::operation("contains", "byte must be in range(0, 256)")
                })?;
                haystack.contains(&byte)
            }
            (haystack, needle) => {
                return Err(SecretError::operation(
                    "contains",
                    format!(
                        "cannot look for {} in {}",
                        needle.kind(),
                        haystack.kind()
                    ),
                ))
            }
        };
        SecretBool::new(found)
    }

    /// The sequence in reverse order, sealed.
    pub fn reversed(&self) -> Result<SecretStr> {
        let plaintext = self.0.open()?;
        match &*plaintext {
            ProtectedValue::Text(s) => Self::seal_str(ProtectedValue::Text(s.chars().rev().collect())),
            ProtectedValue::Bytes(b) => {
                Self::seal_str(ProtectedValue::Bytes(b.iter().rev().copied().collect()))
            }
            other => Err(Self::sequence_error("reversed", other)),
        }
    }

    /// A lazy iterator over the sealed elements.
    ///
    /// The plaintext is decrypted once per call; each element is sealed as it
    /// is produced. Call again to restart.
    pub fn iter(&self) -> Result<SecretIter> {
        let plaintext = self.0.open()?;
        if element_count(&plaintext).is_none() {
            return Err(Self::sequence_error("iter", &plaintext));
        }
        Ok(SecretIter {
            plaintext,
            position: 0,
        })
    }

    fn forward_bool(&self, name: &str, args: &[Native]) -> Result<SecretBool> {
        self.forward_member(name, args)?.into_bool()
    }

    fn forward_str(&self, name: &str, args: &[Native]) -> Result<SecretStr> {
        self.forward_member(name, args)?.into_str()
    }

    pub fn is_alphanumeric(&self) -> Result<SecretBool> {
        self.forward_bool("is_alphanumeric", &[])
    }

    pub fn to_uppercase(&self) -> Result<SecretStr> {
        self.forward_str("to_uppercase", &[])
    }

    pub fn to_lowercase(&self) -> Result<SecretStr> {
        self.forward_str("to_lowercase", &[])
    }

    pub fn trim(&self) -> Result<SecretStr> {
        self.forward_str("trim", &[])
    }

    pub fn starts_with(&self, prefix: impl Into<Native>) -> Result<SecretBool> {
        self.forward_bool("starts_with", &[prefix.into()])
    }

    pub fn ends_with(&self, suffix: impl Into<Native>) -> Result<SecretBool> {
        self.forward_bool("ends_with", &[suffix.into()])
    }
}

fn element_count(value: &ProtectedValue) -> Option<usize> {
    match value {
        ProtectedValue::Text(s) => Some(s.chars().count()),
        ProtectedValue::Bytes(b) => Some(b.len()),
        _ => None,
    }
}

fn clamp<R: RangeBounds<usize>>(range: &R, len: usize) -> (usize, usize) {
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.saturating_add(1),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };
    let end = end.min(len);
    (start.min(end), end)
}

impl Sealed for SecretStr {
    fn container(&self) -> &Secret {
        &self.0
    }

    /// Text and bytes convert into each other directly; other targets use
    /// the generic conversion.
    fn cast_with(&self, kind: Kind, args: &[Native]) -> Result<Wrapped> {
        let plaintext = self.0.open()?;
        let converted = Zeroizing::new(native::cast(&plaintext, kind, args)?);
        match kind {
            Kind::Text | Kind::Bytes => Self::seal(&converted).map(Wrapped::Str),
            _ => dispatch::seal_value(&converted),
        }
    }
}

impl fmt::Display for SecretStr {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        refuse_display("SecretStr")
    }
}

impl fmt::Debug for SecretStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        hidden_debug(f, "SecretStr", &self.0)
    }
}

/// Iterator over the elements of a [`SecretStr`], each one sealed.
///
/// Holds the decrypted sequence until it is dropped.
pub struct SecretIter {
    plaintext: Zeroizing<ProtectedValue>,
    position: usize,
}

impl Iterator for SecretIter {
    type Item = Result<Wrapped>;

    fn next(&mut self) -> Option<Self::Item> {
        let element = match &*self.plaintext {
            ProtectedValue::Text(s) => {
                let c = s.get(self.position..)?.chars().next()?;
                self.position += c.len_utf8();
                ProtectedValue::Text(c.to_string())
            }
            ProtectedValue::Bytes(b) => {
                let byte = *b.get(self.position)?;
                self.position += 1;
                ProtectedValue::Integer(i128::from(byte))
            }
            _ => return None,
        };
        let element = Zeroizing::new(element);
        Some(dispatch::seal_value(&element))
    }
}

impl fmt::Debug for SecretIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretIter(<hidden>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::SecretPolicy;
    use serial_test::serial;

    fn reveal_text(value: &impl Sealed) -> String {
        value
            .reveal_scoped(|plaintext| plaintext.as_text().map(str::to_owned))
            .unwrap()
            .unwrap()
    }

    fn reveal_bool(value: &SecretBool) -> bool {
        value
            .reveal_scoped(|plaintext| plaintext.as_bool())
            .unwrap()
            .unwrap()
    }

    #[test]
    #[serial]
    fn test_len_follows_policy() {
        let secret = SecretStr::new("abc").unwrap();

        globals::set_policy(SecretPolicy::new().with_length_policy(LengthPolicy::Exact));
        assert_eq!(secret.len().unwrap(), 3);

        globals::set_policy(
            SecretPolicy::new().with_length_policy(LengthPolicy::Decoy { upper_bound: 5 }),
        );
        for _ in 0..20 {
            assert!(secret.len().unwrap() < 5);
        }

        globals::reset_policy();
    }

    #[test]
    fn test_sealed_len_and_is_empty() {
        let secret = SecretStr::new("héllo").unwrap();
        let len = secret.sealed_len().unwrap();
        assert_eq!(len.reveal_scoped(|v| v.as_integer()).unwrap(), Some(5));
        assert!(!reveal_bool(&secret.is_empty().unwrap()));
        assert!(reveal_bool(&SecretStr::new("").unwrap().is_empty().unwrap()));
    }

    #[test]
    fn test_index_at() {
        let text = SecretStr::new("abc").unwrap();
        let element = text.index_at(1).unwrap();
        assert_eq!(reveal_text(&element), "b");
        assert!(matches!(
            text.index_at(3),
            Err(SecretError::Operation { .. })
        ));

        let bytes = SecretStr::from_bytes(vec![7_u8, 8]).unwrap();
        let element = bytes.index_at(0).unwrap();
        assert_eq!(element.variant_name(), "number");
    }

    #[test]
    fn test_slice_and_reverse() {
        let text = SecretStr::new("foobar").unwrap();
        assert_eq!(reveal_text(&text.slice(1..4).unwrap()), "oob");
        assert_eq!(reveal_text(&text.slice(3..).unwrap()), "bar");
        assert_eq!(reveal_text(&text.slice(4..100).unwrap()), "ar");
        assert_eq!(reveal_text(&text.reversed().unwrap()), "raboof");
    }

    #[test]
    fn test_contains() {
        let text = SecretStr::new("foobar").unwrap();
        assert!(reveal_bool(&text.contains("oba").unwrap()));
        assert!(!reveal_bool(&text.contains("xyz").unwrap()));
        assert!(text.contains(&1).is_err());

        let bytes = SecretStr::from_bytes(b"\x01\x02\x03".to_vec()).unwrap();
        assert!(reveal_bool(&bytes.contains(&2).unwrap()));
        assert!(reveal_bool(&bytes.contains(b"\x02\x03".as_slice()).unwrap()));
    }

    #[test]
    fn test_iter_is_restartable() {
        let text = SecretStr::new("ab").unwrap();
        for _ in 0..2 {
            let elements: Vec<String> = text
                .iter()
                .unwrap()
                .map(|element| reveal_text(&element.unwrap()))
                .collect();
            assert_eq!(elements, vec!["a", "b"]);
        }
    }

    #[test]
    fn test_str_bytes_fast_path() {
        let text = SecretStr::new("foobar123").unwrap();
        let bytes = text.cast(Kind::Bytes).unwrap();
        assert_eq!(bytes.protected_type().unwrap(), Kind::Bytes);

        let back = bytes.cast(Kind::Text).unwrap();
        assert_eq!(reveal_text(&back), "foobar123");
    }

    #[test]
    fn test_typed_helpers() {
        let text = SecretStr::new("  Hello ").unwrap();
        assert_eq!(reveal_text(&text.trim().unwrap()), "Hello");
        assert_eq!(reveal_text(&text.to_uppercase().unwrap()), "  HELLO ");
        assert!(reveal_bool(&text.starts_with("  H").unwrap()));
        assert!(!reveal_bool(&text.is_alphanumeric().unwrap()));
    }

    #[test]
    fn test_display_is_blocked() {
        let text = SecretStr::new("abc").unwrap();
        let mut out = String::new();
        assert!(fmt::write(&mut out, format_args!("{}", text)).is_err());
        assert_eq!(format!("{:?}", text), "SecretStr(str, <hidden>)");
    }
}
