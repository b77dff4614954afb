//! Operator overloads and the named arithmetic methods.
//!
//! Every operator decrypts its sealed operand(s), runs the native operation
//! and seals the result, so the output is a `Result<Wrapped>` rather than a
//! plain value. `+` and `*` are available on every container; the rest of the
//! numeric surface is available on [`SecretNumber`] and [`Wrapped`].
//!
//! The named methods live on the [`Arithmetic`] trait and are generated from
//! one table per family, with a forward form (`secret.sub_with(&x)` is
//! `secret - x`) and a reflected form (`secret.rsub(&x)` is `x - secret`).

use crate::containers::{SecretBool, SecretNumber, SecretStr, Wrapped};
use crate::dispatch::{self, Operand};
use crate::error::Result;
use crate::native::{self, BinaryOp, CompareOp, UnaryOp};
use crate::secret::Secret;
use zeroize::Zeroizing;

pub(crate) fn binary_op<L, R>(op: BinaryOp, lhs: &L, rhs: &R) -> Result<Wrapped>
where
    L: Operand + ?Sized,
    R: Operand + ?Sized,
{
    let left = lhs.reveal_operand()?;
    let right = rhs.reveal_operand()?;
    let result = Zeroizing::new(native::binary(op, &left, &right)?);
    dispatch::seal_value(&result)
}

fn unary_op<T: Operand + ?Sized>(op: UnaryOp, value: &T) -> Result<Wrapped> {
    let plaintext = value.reveal_operand()?;
    let result = Zeroizing::new(native::unary(op, &plaintext)?);
    dispatch::seal_value(&result)
}

fn ordering_op<L, R>(op: CompareOp, lhs: &L, rhs: &R) -> Result<SecretBool>
where
    L: Operand + ?Sized,
    R: Operand + ?Sized,
{
    let left = lhs.reveal_operand()?;
    let right = rhs.reveal_operand()?;
    SecretBool::new(native::ordering(op, &left, &right)?)
}

fn div_mod_op<L, R>(lhs: &L, rhs: &R) -> Result<(Wrapped, Wrapped)>
where
    L: Operand + ?Sized,
    R: Operand + ?Sized,
{
    let left = lhs.reveal_operand()?;
    let right = rhs.reveal_operand()?;
    let (quotient, remainder) = native::div_mod(&left, &right)?;
    let quotient = Zeroizing::new(quotient);
    let remainder = Zeroizing::new(remainder);
    Ok((
        dispatch::seal_value(&quotient)?,
        dispatch::seal_value(&remainder)?,
    ))
}

macro_rules! operator {
    ($trait:ident, $method:ident, $op:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl<O: Operand> std::ops::$trait<O> for &$ty {
                type Output = Result<Wrapped>;

                fn $method(self, rhs: O) -> Self::Output {
                    binary_op(BinaryOp::$op, self, &rhs)
                }
            }

            impl<O: Operand> std::ops::$trait<O> for $ty {
                type Output = Result<Wrapped>;

                fn $method(self, rhs: O) -> Self::Output {
                    binary_op(BinaryOp::$op, &self, &rhs)
                }
            }
        )+
    };
}

// Plain left operand, sealed right operand.
macro_rules! reflected {
    (@one $trait:ident, $method:ident, $op:ident, [$($lhs:ty),+], $rhs:ty) => {
        $(
            impl std::ops::$trait<&$rhs> for $lhs {
                type Output = Result<Wrapped>;

                fn $method(self, rhs: &$rhs) -> Self::Output {
                    binary_op(BinaryOp::$op, &self, rhs)
                }
            }
        )+
    };
    ($trait:ident, $method:ident, $op:ident, $lhs:tt => $($rhs:ty),+ $(,)?) => {
        $( reflected!(@one $trait, $method, $op, $lhs, $rhs); )+
    };
}

operator!(Add, add, Add => Secret, SecretBool, SecretNumber, SecretStr, Wrapped);
operator!(Mul, mul, Mul => Secret, SecretBool, SecretNumber, SecretStr, Wrapped);

operator!(Sub, sub, Sub => SecretNumber, Wrapped);
operator!(Div, div, TrueDiv => SecretNumber, Wrapped);
operator!(Rem, rem, Mod => SecretNumber, Wrapped);
operator!(Shl, shl, Shl => SecretNumber, Wrapped);
operator!(Shr, shr, Shr => SecretNumber, Wrapped);
operator!(BitAnd, bitand, BitAnd => SecretNumber, Wrapped);
operator!(BitOr, bitor, BitOr => SecretNumber, Wrapped);
operator!(BitXor, bitxor, BitXor => SecretNumber, Wrapped);

reflected!(Add, add, Add, [i32, i64, i128, u8, u32, u64, usize, f64, &str]
    => Secret, SecretBool, SecretNumber, SecretStr, Wrapped);
reflected!(Mul, mul, Mul, [i32, i64, i128, u8, u32, u64, usize, f64]
    => Secret, SecretBool, SecretNumber, SecretStr, Wrapped);

reflected!(Sub, sub, Sub, [i32, i64, i128, u8, u32, u64, usize, f64] => SecretNumber, Wrapped);
reflected!(Div, div, TrueDiv, [i32, i64, i128, u8, u32, u64, usize, f64] => SecretNumber, Wrapped);
reflected!(Rem, rem, Mod, [i32, i64, i128, u8, u32, u64, usize, f64] => SecretNumber, Wrapped);
reflected!(Shl, shl, Shl, [i32, i64, i128, u8, u32, u64, usize] => SecretNumber, Wrapped);
reflected!(Shr, shr, Shr, [i32, i64, i128, u8, u32, u64, usize] => SecretNumber, Wrapped);
reflected!(BitAnd, bitand, BitAnd, [i32, i64, i128, u8, u32, u64, usize] => SecretNumber, Wrapped);
reflected!(BitOr, bitor, BitOr, [i32, i64, i128, u8, u32, u64, usize] => SecretNumber, Wrapped);
reflected!(BitXor, bitxor, BitXor, [i32, i64, i128, u8, u32, u64, usize] => SecretNumber, Wrapped);

impl std::ops::Neg for &SecretNumber {
    type Output = Result<Wrapped>;

    fn neg(self) -> Self::Output {
        unary_op(UnaryOp::Neg, self)
    }
}

impl std::ops::Neg for SecretNumber {
    type Output = Result<Wrapped>;

    fn neg(self) -> Self::Output {
        unary_op(UnaryOp::Neg, &self)
    }
}

impl std::ops::Neg for &Wrapped {
    type Output = Result<Wrapped>;

    fn neg(self) -> Self::Output {
        unary_op(UnaryOp::Neg, self)
    }
}

impl std::ops::Neg for Wrapped {
    type Output = Result<Wrapped>;

    fn neg(self) -> Self::Output {
        unary_op(UnaryOp::Neg, &self)
    }
}

/// Bitwise inversion.
impl std::ops::Not for &SecretNumber {
    type Output = Result<Wrapped>;

    fn not(self) -> Self::Output {
        unary_op(UnaryOp::Invert, self)
    }
}

impl std::ops::Not for SecretNumber {
    type Output = Result<Wrapped>;

    fn not(self) -> Self::Output {
        unary_op(UnaryOp::Invert, &self)
    }
}

/// Logical negation for a sealed bool, bitwise inversion otherwise.
impl std::ops::Not for &Wrapped {
    type Output = Result<Wrapped>;

    fn not(self) -> Self::Output {
        match self {
            Wrapped::Bool(inner) => inner.flip().map(Wrapped::Bool),
            other => unary_op(UnaryOp::Invert, other),
        }
    }
}

impl std::ops::Not for Wrapped {
    type Output = Result<Wrapped>;

    fn not(self) -> Self::Output {
        !&self
    }
}

macro_rules! binary_methods {
    ($($op:ident => $forward:ident, $reflected:ident;)+) => {
        $(
            #[doc = concat!("`", stringify!($op), "` with this value on the left.")]
            fn $forward<O: Operand + ?Sized>(&self, other: &O) -> Result<Wrapped> {
                binary_op(BinaryOp::$op, self, other)
            }

            #[doc = concat!("`", stringify!($op), "` with this value on the right.")]
            fn $reflected<O: Operand + ?Sized>(&self, other: &O) -> Result<Wrapped> {
                binary_op(BinaryOp::$op, other, self)
            }
        )+
    };
}

macro_rules! unary_methods {
    ($($op:ident => $name:ident;)+) => {
        $(
            fn $name(&self) -> Result<Wrapped> {
                unary_op(UnaryOp::$op, self)
            }
        )+
    };
}

macro_rules! comparison_methods {
    ($($op:ident => $name:ident;)+) => {
        $(
            fn $name<O: Operand + ?Sized>(&self, other: &O) -> Result<SecretBool> {
                ordering_op(CompareOp::$op, self, other)
            }
        )+
    };
}

/// The named numeric surface of [`SecretNumber`] and [`Wrapped`].
///
/// Forward names that would clash with a `std::ops` method carry a `_with`
/// suffix, so `a.sub_with(&b)` is `&a - &b` and `a.rsub(&b)` is `b - a`.
/// Every method seals its result.
pub trait Arithmetic: Operand {
    binary_methods! {
        Add => add_with, radd;
        Sub => sub_with, rsub;
        Mul => mul_with, rmul;
        TrueDiv => true_div, rtrue_div;
        FloorDiv => floor_div, rfloor_div;
        Mod => modulo, rmodulo;
        Pow => pow, rpow;
        Shl => shl_with, rshl;
        Shr => shr_with, rshr;
        BitAnd => bitand_with, rbitand;
        BitOr => bitor_with, rbitor;
        BitXor => bitxor_with, rbitxor;
    }

    unary_methods! {
        Neg => negate;
        Pos => pos;
        Abs => abs;
        Invert => invert;
        Round => round;
        Trunc => trunc;
        Floor => floor;
        Ceil => ceil;
    }

    comparison_methods! {
        Lt => lt;
        Le => le;
        Gt => gt;
        Ge => ge;
    }

    /// Floor division and modulo, both sealed.
    fn div_mod<O: Operand + ?Sized>(&self, other: &O) -> Result<(Wrapped, Wrapped)> {
        div_mod_op(self, other)
    }

    /// [`Arithmetic::div_mod`] with this value as the divisor.
    fn rdiv_mod<O: Operand + ?Sized>(&self, other: &O) -> Result<(Wrapped, Wrapped)> {
        div_mod_op(other, self)
    }
}

impl Arithmetic for SecretNumber {}

impl Arithmetic for Wrapped {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::wrap;
    use crate::error::SecretError;
    use crate::secret::Sealed;
    use crate::value::ProtectedValue;

    fn reveal(value: &Wrapped) -> ProtectedValue {
        value.reveal_scoped(ProtectedValue::clone).unwrap()
    }

    #[test]
    fn test_arithmetic_chain() {
        let start = wrap(42).unwrap();
        let hundred = (&start + 58).unwrap();
        assert_eq!(reveal(&hundred), ProtectedValue::Integer(100));

        let shifted = (&hundred << 4).unwrap();
        assert_eq!(reveal(&shifted), ProtectedValue::Integer(1600));

        let product = ((&shifted >> 4).unwrap() * &hundred).unwrap();
        assert_eq!(reveal(&product), ProtectedValue::Integer(10000));

        let result = product.floor_div(&100).unwrap();
        assert_eq!(reveal(&result), ProtectedValue::Integer(100));
    }

    #[test]
    fn test_reflected_operators() {
        let number = wrap(10).unwrap();
        assert_eq!(reveal(&(3_i32 - &number).unwrap()), ProtectedValue::Integer(-7));
        assert_eq!(reveal(&(100_i32 % &number).unwrap()), ProtectedValue::Integer(0));
        assert_eq!(reveal(&number.rsub(&3).unwrap()), ProtectedValue::Integer(-7));
        assert_eq!(reveal(&number.rpow(&2).unwrap()), ProtectedValue::Integer(1024));

        let text = wrap("bar").unwrap();
        assert_eq!(
            reveal(&("foo" + &text).unwrap()),
            ProtectedValue::Text("foobar".into())
        );
        assert_eq!(
            reveal(&(2_i32 * &text).unwrap()),
            ProtectedValue::Text("barbar".into())
        );
    }

    #[test]
    fn test_division_and_modulo() {
        let number = wrap(-7).unwrap();
        assert_eq!(reveal(&(&number / 2).unwrap()), ProtectedValue::Float(-3.5));
        assert_eq!(reveal(&(&number % 2).unwrap()), ProtectedValue::Integer(1));

        let (quotient, remainder) = number.div_mod(&2).unwrap();
        assert_eq!(reveal(&quotient), ProtectedValue::Integer(-4));
        assert_eq!(reveal(&remainder), ProtectedValue::Integer(1));

        assert!(matches!(
            number.floor_div(&0),
            Err(SecretError::Operation { .. })
        ));
    }

    #[test]
    fn test_unary_methods() {
        let number = wrap(-5).unwrap();
        assert_eq!(reveal(&(-&number).unwrap()), ProtectedValue::Integer(5));
        assert_eq!(reveal(&number.abs().unwrap()), ProtectedValue::Integer(5));
        assert_eq!(reveal(&(!&number).unwrap()), ProtectedValue::Integer(4));

        let float = wrap(2.5).unwrap();
        assert_eq!(reveal(&float.round().unwrap()), ProtectedValue::Integer(2));
        assert_eq!(reveal(&float.ceil().unwrap()), ProtectedValue::Integer(3));
    }

    #[test]
    fn test_not_on_wrapped_bool_flips() {
        let flag = wrap(true).unwrap();
        assert_eq!(reveal(&(!&flag).unwrap()), ProtectedValue::Bool(false));
    }

    #[test]
    fn test_comparisons_are_sealed() {
        let number = wrap(5).unwrap();
        let less = number.lt(&10).unwrap();
        assert_eq!(less.reveal_scoped(|v| v.as_bool()).unwrap(), Some(true));
        assert!(matches!(less.truthy(), Err(SecretError::ControlFlow)));

        let ge = number.ge(&5).unwrap();
        assert_eq!(ge.reveal_scoped(|v| v.as_bool()).unwrap(), Some(true));
    }

    #[test]
    fn test_mixed_operands() {
        let number = wrap(1).unwrap();
        assert_eq!(reveal(&(&number + 0.5).unwrap()), ProtectedValue::Float(1.5));
        assert!(matches!(
            &number + "x",
            Err(SecretError::Operation { .. })
        ));

        let a = SecretNumber::new(2).unwrap();
        let b = SecretNumber::new(3).unwrap();
        assert_eq!(reveal(&(&a * &b).unwrap()), ProtectedValue::Integer(6));
        assert_eq!(reveal(&a.pow(&b).unwrap()), ProtectedValue::Integer(8));
    }

    #[test]
    fn test_base_surface_on_generic_container() {
        let secret = Secret::new(1.5).unwrap();
        assert_eq!(reveal(&(&secret * 2).unwrap()), ProtectedValue::Float(3.0));
        assert_eq!(reveal(&(1_i32 + &secret).unwrap()), ProtectedValue::Float(2.5));
    }

    #[test]
    fn test_string_concatenation() {
        let text = SecretStr::new("foo").unwrap();
        let joined = (&text + "bar").unwrap();
        let same = joined.equals("foobar").unwrap();
        assert_eq!(same.reveal_scoped(|v| v.as_bool()).unwrap(), Some(true));
    }
}
