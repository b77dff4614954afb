//! The specialized containers and the dispatcher's result type.

mod boolean;
mod number;
mod string;
mod wrapped;

pub use boolean::SecretBool;
pub use number::SecretNumber;
pub use string::{SecretIter, SecretStr};
pub use wrapped::Wrapped;
