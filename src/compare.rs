//! Constant-time equality between sealed and plain values.

use crate::containers::SecretBool;
use crate::dispatch::Operand;
use crate::error::Result;
use crate::native;
use crate::util::constant_time_eq;
use crate::value::ProtectedValue;
use std::hint::black_box;
use zeroize::Zeroizing;

/// The byte encoding a value is compared through.
///
/// Text and bytes compare as they are; every other kind compares through its
/// deterministic textual form.
fn comparison_encoding(value: &ProtectedValue) -> Zeroizing<Vec<u8>> {
    Zeroizing::new(match value {
        ProtectedValue::Text(s) => s.as_bytes().to_vec(),
        ProtectedValue::Bytes(b) => b.clone(),
        other => native::repr(other).as_bytes().to_vec(),
    })
}

/// Compares `a` and `b` in time that depends only on the longer encoding.
///
/// Both sides are unwrapped first, so either may be sealed or plain. When the
/// two values are of different kinds, a dummy comparison against an empty
/// encoding still runs and the result is a sealed `false`.
///
/// # Example
/// ```
/// use secret_type::{compare, wrap, Sealed};
///
/// let secret = wrap("foobar123").unwrap();
/// let same = compare(&secret, "foobar123").unwrap();
/// assert_eq!(same.reveal_scoped(|value| value.as_bool()).unwrap(), Some(true));
/// ```
pub fn compare<A, B>(a: &A, b: &B) -> Result<SecretBool>
where
    A: Operand + ?Sized,
    B: Operand + ?Sized,
{
    let left = a.reveal_operand()?;
    let right = b.reveal_operand()?;
    let left_encoding = comparison_encoding(&left);
    let right_encoding = comparison_encoding(&right);

    if left.kind() == right.kind() {
        let equal = constant_time_eq(&left_encoding, &right_encoding);
        SecretBool::new(bool::from(equal))
    } else {
        // Same work as a same-kind miss, and kept alive through the optimizer
        let empty: &[u8] = &[];
        let _ = black_box(constant_time_eq(black_box(&left_encoding), black_box(empty)));
        SecretBool::new(false)
    }
}
