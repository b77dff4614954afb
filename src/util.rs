use crate::error::{Result, SecretError};
use rand::Rng;
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, Zeroizing};

/// Securely wipes a byte slice by overwriting it with zeros.
///
/// `zeroize` keeps the compiler from optimizing the write away.
pub(crate) fn wipe(buffer: &mut [u8]) {
    buffer.zeroize();
}

/// Fills a byte slice with cryptographically secure random bytes.
///
/// # Errors
///
/// * `SecretError::Random` - If the system random source fails
pub(crate) fn scramble(buffer: &mut [u8]) -> Result<()> {
    getrandom::getrandom(buffer).map_err(|e| SecretError::Random(e.to_string()))
}

/// Compares two byte slices in constant time.
///
/// Both inputs are zero-padded to the longer length before the `subtle`
/// comparison runs, so the amount of work depends only on that length and not
/// on where (or whether) the slices differ. A length mismatch is folded into
/// the result as another `Choice` rather than returned early.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> Choice {
    let width = a.len().max(b.len());
    let mut left = Zeroizing::new(vec![0_u8; width]);
    let mut right = Zeroizing::new(vec![0_u8; width]);
    left[..a.len()].copy_from_slice(a);
    right[..b.len()].copy_from_slice(b);

    let same_len = (a.len() as u64).ct_eq(&(b.len() as u64));
    left.as_slice().ct_eq(right.as_slice()) & same_len
}

/// Generates `length` random hex characters without leaving an unwiped copy behind.
pub(crate) fn random_hex(length: usize) -> Result<Zeroizing<String>> {
    let mut raw = Zeroizing::new(vec![0_u8; length.div_ceil(2)]);
    scramble(&mut raw)?;

    let mut encoded = Zeroizing::new(hex::encode(raw.as_slice()));
    encoded.truncate(length);
    Ok(encoded)
}

/// A random length in `0..upper_bound`, reported instead of the real one.
pub(crate) fn decoy_length(upper_bound: usize) -> usize {
    if upper_bound == 0 {
        return 0;
    }
    rand::thread_rng().gen_range(0..upper_bound)
}
