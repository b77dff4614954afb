//! # secret-type
//!
//! `secret-type` marks primitive values as sensitive. A wrapped value cannot be
//! printed, logged, hashed, used as a key or index, or used to drive control
//! flow, and every value derived from it is wrapped again.
//!
//! - **Encryption at rest**: each container holds its value encrypted under its
//!   own ChaCha20-Poly1305 key; plaintext only exists for the duration of a
//!   single operation and is wiped afterwards.
//! - **Virality**: arithmetic, casts, comparisons and forwarded member calls
//!   all return sealed values.
//! - **Constant-time equality**: `equals`/`compare` run in time that depends
//!   only on the length of the longer operand.
//! - **Introspection blocking**: `Display`, conversions to native strings,
//!   bytes and numbers, and hashing all fail with a [`SecretError`].
//!
//! ## Key Components
//!
//! - [`wrap`] / [`unwrap`]: the entry points; `wrap` picks the container.
//! - [`Secret`]: the generic container.
//! - [`SecretStr`], [`SecretBool`], [`SecretNumber`]: the specialized containers.
//! - [`Sealed`]: the shared contract, including the escape hatches
//!   (`cast`, `apply_and_discard`, `apply_and_wrap`, `reveal_scoped`).
//! - [`Arithmetic`]: named numeric methods (`floor_div`, `pow`, `rsub`, ...).
//! - [`SecretPolicy`]: process-wide behavior knobs.
//!
//! ## Example Usage
//!
//! ```rust
//! use secret_type::{wrap, Kind, Sealed, SecretError};
//!
//! fn main() -> Result<(), SecretError> {
//!     let password = wrap("foobar123")?;
//!
//!     // Comparisons stay sealed.
//!     let same = password.equals("foobar123")?;
//!     assert!(matches!(same.truthy(), Err(SecretError::ControlFlow)));
//!
//!     // Printing is refused.
//!     assert!(matches!(password.to_text(), Err(SecretError::Examination)));
//!
//!     // Escape hatches are the only way to the plaintext.
//!     let bytes = password.cast(Kind::Bytes)?;
//!     let length = bytes.reveal_scoped(|value| value.as_bytes().map(<[u8]>::len))?;
//!     assert_eq!(length, Some(9));
//!
//!     // Arithmetic results are sealed too.
//!     let total = (&wrap(40)? + 2)?;
//!     let answer = total.equals(&42)?;
//!     assert_eq!(answer.to_string(), "true");
//!     Ok(())
//! }
//! ```

mod compare;
mod containers;
mod dispatch;
mod enclave;
mod error;
mod globals;
mod members;
mod native;
mod ops;
mod policy;
mod secret;
mod util;
mod value;

pub use compare::compare;
pub use containers::{SecretBool, SecretIter, SecretNumber, SecretStr, Wrapped};
pub use dispatch::{unwrap, wrap, IntoSecret, Operand};
pub use error::{Result, SecretError};
pub use globals::{policy, reset_policy, set_policy};
pub use ops::Arithmetic;
pub use policy::{LengthPolicy, SecretPolicy, DEFAULT_DECOY_UPPER_BOUND, DEFAULT_TOKEN_LENGTH};
pub use secret::{Sealed, Secret};
pub use value::{Kind, Native, ProtectedValue};

#[cfg(test)]
use ctor::ctor;

#[cfg(test)]
#[ctor]
fn test_init() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}
