//! Native operations on plaintext values.
//!
//! Containers decrypt into a [`ProtectedValue`], call into this module, and
//! seal whatever comes back. Nothing here knows about secrets. Integer
//! division rounds toward negative infinity and the remainder takes the sign
//! of the divisor; true division and negative exponents produce floats.

use crate::error::{Result, SecretError};
use crate::value::{Kind, Native, ProtectedValue};
use zeroize::Zeroizing;

/// Binary operators with a forward and a reflected form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    TrueDiv,
    FloorDiv,
    Mod,
    Pow,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
}

impl BinaryOp {
    pub(crate) fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::TrueDiv => "true_div",
            BinaryOp::FloorDiv => "floor_div",
            BinaryOp::Mod => "modulo",
            BinaryOp::Pow => "pow",
            BinaryOp::Shl => "shl",
            BinaryOp::Shr => "shr",
            BinaryOp::BitAnd => "bitand",
            BinaryOp::BitOr => "bitor",
            BinaryOp::BitXor => "bitxor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Neg,
    Pos,
    Abs,
    Invert,
    Round,
    Trunc,
    Floor,
    Ceil,
}

impl UnaryOp {
    pub(crate) fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Pos => "pos",
            UnaryOp::Abs => "abs",
            UnaryOp::Invert => "invert",
            UnaryOp::Round => "round",
            UnaryOp::Trunc => "trunc",
            UnaryOp::Floor => "floor",
            UnaryOp::Ceil => "ceil",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub(crate) fn name(self) -> &'static str {
        match self {
            CompareOp::Lt => "lt",
            CompareOp::Le => "le",
            CompareOp::Gt => "gt",
            CompareOp::Ge => "ge",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i128),
    Float(f64),
}

impl Num {
    fn to_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }
}

fn numeric(value: &ProtectedValue) -> Option<Num> {
    match value {
        ProtectedValue::Bool(b) => Some(Num::Int(i128::from(*b))),
        ProtectedValue::Integer(i) => Some(Num::Int(*i)),
        ProtectedValue::Float(f) => Some(Num::Float(*f)),
        ProtectedValue::Text(_) | ProtectedValue::Bytes(_) => None,
    }
}

fn operand_mismatch(op: &'static str, lhs: &ProtectedValue, rhs: &ProtectedValue) -> SecretError {
    SecretError::operation(
        op,
        format!(
            "unsupported operand types: {} and {}",
            lhs.kind(),
            rhs.kind()
        ),
    )
}

fn overflow(op: &'static str) -> SecretError {
    SecretError::operation(op, "integer overflow")
}

fn zero_division(op: &'static str) -> SecretError {
    SecretError::operation(op, "division by zero")
}

fn too_long(op: &'static str) -> SecretError {
    SecretError::operation(op, "repeated sequence is too long")
}

/// Clamped repeat count and total length, checked against the allocation limit.
fn repeat_plan(op: &'static str, len: usize, count: i128) -> Result<(usize, usize)> {
    if len == 0 || count <= 0 {
        return Ok((0, 0));
    }
    let count = usize::try_from(count).map_err(|_| too_long(op))?;
    let total = len
        .checked_mul(count)
        .filter(|total| *total <= isize::MAX.unsigned_abs())
        .ok_or_else(|| too_long(op))?;
    Ok((count, total))
}

/// `text` repeated `count` times; a non-positive count yields an empty string.
pub(crate) fn repeat_text(op: &'static str, text: &str, count: i128) -> Result<String> {
    let (count, total) = repeat_plan(op, text.len(), count)?;
    let mut out = String::new();
    out.try_reserve_exact(total).map_err(|_| too_long(op))?;
    for _ in 0..count {
        out.push_str(text);
    }
    Ok(out)
}

/// `bytes` repeated `count` times; a non-positive count yields an empty buffer.
pub(crate) fn repeat_bytes(op: &'static str, bytes: &[u8], count: i128) -> Result<Vec<u8>> {
    let (count, total) = repeat_plan(op, bytes.len(), count)?;
    let mut out = Vec::new();
    out.try_reserve_exact(total).map_err(|_| too_long(op))?;
    for _ in 0..count {
        out.extend_from_slice(bytes);
    }
    Ok(out)
}

/// Applies `op` to two plaintext operands.
pub(crate) fn binary(
    op: BinaryOp,
    lhs: &ProtectedValue,
    rhs: &ProtectedValue,
) -> Result<ProtectedValue> {
    use ProtectedValue::{Bool, Bytes, Integer, Text};

    match (op, lhs, rhs) {
        (BinaryOp::Add, Text(a), Text(b)) => Ok(Text(format!("{a}{b}"))),
        (BinaryOp::Add, Bytes(a), Bytes(b)) => Ok(Bytes([a.as_slice(), b.as_slice()].concat())),
        (BinaryOp::Mul, Text(s), n @ (Integer(_) | Bool(_)))
        | (BinaryOp::Mul, n @ (Integer(_) | Bool(_)), Text(s)) => {
            let count = match numeric(n) {
                Some(Num::Int(count)) => count,
                _ => return Err(operand_mismatch(op.name(), lhs, rhs)),
            };
            repeat_text(op.name(), s, count).map(Text)
        }
        (BinaryOp::Mul, Bytes(b), n @ (Integer(_) | Bool(_)))
        | (BinaryOp::Mul, n @ (Integer(_) | Bool(_)), Bytes(b)) => {
            let count = match numeric(n) {
                Some(Num::Int(count)) => count,
                _ => return Err(operand_mismatch(op.name(), lhs, rhs)),
            };
            repeat_bytes(op.name(), b, count).map(Bytes)
        }
        (BinaryOp::BitAnd, Bool(a), Bool(b)) => Ok(Bool(*a & *b)),
        (BinaryOp::BitOr, Bool(a), Bool(b)) => Ok(Bool(*a | *b)),
        (BinaryOp::BitXor, Bool(a), Bool(b)) => Ok(Bool(*a ^ *b)),
        _ => match (numeric(lhs), numeric(rhs)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => integer_binary(op, a, b),
            (Some(a), Some(b)) => float_binary(op, a.to_f64(), b.to_f64())
                .ok_or_else(|| operand_mismatch(op.name(), lhs, rhs))?,
            _ => Err(operand_mismatch(op.name(), lhs, rhs)),
        },
    }
}

fn floor_div(a: i128, b: i128) -> Option<i128> {
    let q = a.checked_div(b)?;
    let r = a.checked_rem(b)?;
    if r != 0 && ((r < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

fn floor_mod(a: i128, b: i128) -> i128 {
    if b == -1 {
        return 0;
    }
    let r = a % b;
    if r != 0 && ((r < 0) != (b < 0)) {
        r + b
    } else {
        r
    }
}

fn integer_binary(op: BinaryOp, a: i128, b: i128) -> Result<ProtectedValue> {
    use ProtectedValue::{Float, Integer};
    let name = op.name();

    match op {
        BinaryOp::Add => a.checked_add(b).map(Integer).ok_or_else(|| overflow(name)),
        BinaryOp::Sub => a.checked_sub(b).map(Integer).ok_or_else(|| overflow(name)),
        BinaryOp::Mul => a.checked_mul(b).map(Integer).ok_or_else(|| overflow(name)),
        BinaryOp::TrueDiv => {
            if b == 0 {
                return Err(zero_division(name));
            }
            Ok(Float(a as f64 / b as f64))
        }
        BinaryOp::FloorDiv => {
            if b == 0 {
                return Err(zero_division(name));
            }
            floor_div(a, b).map(Integer).ok_or_else(|| overflow(name))
        }
        BinaryOp::Mod => {
            if b == 0 {
                return Err(zero_division(name));
            }
            Ok(Integer(floor_mod(a, b)))
        }
        BinaryOp::Pow => {
            if b < 0 {
                if a == 0 {
                    return Err(SecretError::operation(
                        name,
                        "0 cannot be raised to a negative power",
                    ));
                }
                return Ok(Float((a as f64).powf(b as f64)));
            }
            let exponent = u32::try_from(b).map_err(|_| overflow(name))?;
            a.checked_pow(exponent).map(Integer).ok_or_else(|| overflow(name))
        }
        BinaryOp::Shl => {
            if b < 0 {
                return Err(SecretError::operation(name, "negative shift count"));
            }
            if a == 0 {
                return Ok(Integer(0));
            }
            if b >= 127 {
                return Err(overflow(name));
            }
            let shifted = a << b;
            if shifted >> b != a {
                return Err(overflow(name));
            }
            Ok(Integer(shifted))
        }
        BinaryOp::Shr => {
            if b < 0 {
                return Err(SecretError::operation(name, "negative shift count"));
            }
            if b >= 127 {
                return Ok(Integer(if a < 0 { -1 } else { 0 }));
            }
            Ok(Integer(a >> b))
        }
        BinaryOp::BitAnd => Ok(Integer(a & b)),
        BinaryOp::BitOr => Ok(Integer(a | b)),
        BinaryOp::BitXor => Ok(Integer(a ^ b)),
    }
}

/// Float arithmetic; `None` for operators that are integer-only.
fn float_binary(op: BinaryOp, a: f64, b: f64) -> Option<Result<ProtectedValue>> {
    use ProtectedValue::Float;
    let name = op.name();

    let result = match op {
        BinaryOp::Add => Ok(Float(a + b)),
        BinaryOp::Sub => Ok(Float(a - b)),
        BinaryOp::Mul => Ok(Float(a * b)),
        BinaryOp::TrueDiv | BinaryOp::FloorDiv | BinaryOp::Mod if b == 0.0 => {
            Err(zero_division(name))
        }
        BinaryOp::TrueDiv => Ok(Float(a / b)),
        BinaryOp::FloorDiv => Ok(Float((a / b).floor())),
        BinaryOp::Mod => {
            let r = a % b;
            Ok(Float(if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
                r + b
            } else {
                r
            }))
        }
        BinaryOp::Pow => Ok(Float(a.powf(b))),
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => {
            return None
        }
    };
    Some(result)
}

/// Floor division and modulo in one step.
pub(crate) fn div_mod(
    lhs: &ProtectedValue,
    rhs: &ProtectedValue,
) -> Result<(ProtectedValue, ProtectedValue)> {
    let quotient = binary(BinaryOp::FloorDiv, lhs, rhs)?;
    let remainder = binary(BinaryOp::Mod, lhs, rhs)?;
    Ok((quotient, remainder))
}

fn float_to_int(op: &'static str, value: f64) -> Result<i128> {
    if !value.is_finite() {
        return Err(SecretError::operation(
            op,
            "cannot convert a non-finite float to an integer",
        ));
    }
    // 2^127 is exactly representable as an f64
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    if value >= LIMIT || value < -LIMIT {
        return Err(overflow(op));
    }
    Ok(value as i128)
}

/// Applies a unary operator.
pub(crate) fn unary(op: UnaryOp, value: &ProtectedValue) -> Result<ProtectedValue> {
    use ProtectedValue::{Float, Integer};
    let name = op.name();

    let num = numeric(value).ok_or_else(|| {
        SecretError::operation(name, format!("bad operand type: {}", value.kind()))
    })?;

    match (op, num) {
        (UnaryOp::Neg, Num::Int(i)) => i.checked_neg().map(Integer).ok_or_else(|| overflow(name)),
        (UnaryOp::Neg, Num::Float(f)) => Ok(Float(-f)),
        (UnaryOp::Pos, Num::Float(f)) => Ok(Float(f)),
        (UnaryOp::Abs, Num::Int(i)) => i.checked_abs().map(Integer).ok_or_else(|| overflow(name)),
        (UnaryOp::Abs, Num::Float(f)) => Ok(Float(f.abs())),
        (UnaryOp::Invert, Num::Int(i)) => Ok(Integer(!i)),
        (UnaryOp::Invert, Num::Float(_)) => Err(SecretError::operation(
            name,
            "bad operand type: float",
        )),
        (
            UnaryOp::Pos | UnaryOp::Round | UnaryOp::Trunc | UnaryOp::Floor | UnaryOp::Ceil,
            Num::Int(i),
        ) => Ok(Integer(i)),
        (UnaryOp::Round, Num::Float(f)) => float_to_int(name, f.round_ties_even()).map(Integer),
        (UnaryOp::Trunc, Num::Float(f)) => float_to_int(name, f.trunc()).map(Integer),
        (UnaryOp::Floor, Num::Float(f)) => float_to_int(name, f.floor()).map(Integer),
        (UnaryOp::Ceil, Num::Float(f)) => float_to_int(name, f.ceil()).map(Integer),
    }
}

/// Evaluates an ordering comparison.
pub(crate) fn ordering(op: CompareOp, lhs: &ProtectedValue, rhs: &ProtectedValue) -> Result<bool> {
    use std::cmp::Ordering;
    use ProtectedValue::{Bytes, Text};

    let ord = match (lhs, rhs) {
        (Text(a), Text(b)) => Some(a.cmp(b)),
        (Bytes(a), Bytes(b)) => Some(a.cmp(b)),
        _ => match (numeric(lhs), numeric(rhs)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => Some(a.cmp(&b)),
            (Some(a), Some(b)) => a.to_f64().partial_cmp(&b.to_f64()),
            _ => return Err(operand_mismatch(op.name(), lhs, rhs)),
        },
    };

    // NaN orders against nothing
    Ok(match (op, ord) {
        (_, None) => false,
        (CompareOp::Lt, Some(o)) => o == Ordering::Less,
        (CompareOp::Le, Some(o)) => o != Ordering::Greater,
        (CompareOp::Gt, Some(o)) => o == Ordering::Greater,
        (CompareOp::Ge, Some(o)) => o != Ordering::Less,
    })
}

/// Truthiness: empty text/bytes and numeric zero are false.
pub(crate) fn truthy(value: &ProtectedValue) -> bool {
    match value {
        ProtectedValue::Text(s) => !s.is_empty(),
        ProtectedValue::Bytes(b) => !b.is_empty(),
        ProtectedValue::Bool(b) => *b,
        ProtectedValue::Integer(i) => *i != 0,
        ProtectedValue::Float(f) => *f != 0.0,
    }
}

/// The deterministic textual form of a value.
pub(crate) fn repr(value: &ProtectedValue) -> Zeroizing<String> {
    Zeroizing::new(match value {
        ProtectedValue::Text(s) => s.clone(),
        ProtectedValue::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        ProtectedValue::Bool(b) => b.to_string(),
        ProtectedValue::Integer(i) => i.to_string(),
        ProtectedValue::Float(f) => format!("{f:?}"),
    })
}

fn cast_error(value: &ProtectedValue, to: Kind, reason: impl Into<String>) -> SecretError {
    SecretError::Cast {
        from: value.kind(),
        to,
        reason: reason.into(),
    }
}

fn encoding_arg(value: &ProtectedValue, to: Kind, args: &[Native]) -> Result<()> {
    match args {
        [] => Ok(()),
        [Native::Text(encoding)]
            if encoding.eq_ignore_ascii_case("utf-8") || encoding.eq_ignore_ascii_case("utf8") =>
        {
            Ok(())
        }
        [Native::Text(encoding)] => Err(cast_error(
            value,
            to,
            format!("unknown encoding: {encoding}"),
        )),
        _ => Err(cast_error(value, to, "expected a single encoding argument")),
    }
}

fn radix_arg(value: &ProtectedValue, args: &[Native]) -> Result<Option<u32>> {
    match args {
        [] => Ok(None),
        [Native::Integer(radix)] if (2..=36).contains(radix) => Ok(Some(*radix as u32)),
        [Native::Integer(radix)] => Err(cast_error(
            value,
            Kind::Integer,
            format!("base must be between 2 and 36, got {radix}"),
        )),
        _ => Err(cast_error(value, Kind::Integer, "expected a single base argument")),
    }
}

fn no_args(value: &ProtectedValue, to: Kind, args: &[Native]) -> Result<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(cast_error(value, to, "conversion takes no arguments"))
    }
}

fn utf8<'a>(value: &ProtectedValue, to: Kind, bytes: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| cast_error(value, to, e.to_string()))
}

fn textual<'a>(value: &'a ProtectedValue, to: Kind) -> Result<&'a str> {
    match value {
        ProtectedValue::Text(s) => Ok(s),
        ProtectedValue::Bytes(b) => utf8(value, to, b),
        _ => Err(cast_error(value, to, "not a string")),
    }
}

/// Converts `value` with the native conversion for `target`.
pub(crate) fn cast(value: &ProtectedValue, target: Kind, args: &[Native]) -> Result<ProtectedValue> {
    use ProtectedValue::{Bool, Bytes, Float, Integer, Text};

    match (target, value) {
        (Kind::Text, Text(s)) => {
            no_args(value, target, args)?;
            Ok(Text(s.clone()))
        }
        (Kind::Text, Bytes(b)) => {
            encoding_arg(value, target, args)?;
            Ok(Text(utf8(value, target, b)?.to_owned()))
        }
        (Kind::Text, _) => {
            no_args(value, target, args)?;
            Ok(Text(repr(value).to_string()))
        }

        (Kind::Bytes, Text(s)) => {
            encoding_arg(value, target, args)?;
            Ok(Bytes(s.as_bytes().to_vec()))
        }
        (Kind::Bytes, Bytes(b)) => {
            no_args(value, target, args)?;
            Ok(Bytes(b.clone()))
        }
        (Kind::Bytes, _) => Err(cast_error(value, target, "no byte conversion")),

        (Kind::Bool, _) => {
            no_args(value, target, args)?;
            Ok(Bool(truthy(value)))
        }

        (Kind::Integer, Text(_) | Bytes(_)) => {
            let radix = radix_arg(value, args)?.unwrap_or(10);
            i128::from_str_radix(textual(value, target)?.trim(), radix)
                .map(Integer)
                .map_err(|e| cast_error(value, target, e.to_string()))
        }
        (Kind::Integer, _) if !args.is_empty() => Err(cast_error(
            value,
            target,
            "explicit base requires a string",
        )),
        (Kind::Integer, Bool(b)) => Ok(Integer(i128::from(*b))),
        (Kind::Integer, Integer(i)) => Ok(Integer(*i)),
        (Kind::Integer, Float(f)) => float_to_int("cast", f.trunc())
            .map(Integer)
            .map_err(|e| cast_error(value, target, e.to_string())),

        (Kind::Float, Text(_) | Bytes(_)) => {
            no_args(value, target, args)?;
            textual(value, target)?
                .trim()
                .parse::<f64>()
                .map(Float)
                .map_err(|e| cast_error(value, target, e.to_string()))
        }
        (Kind::Float, _) => {
            no_args(value, target, args)?;
            match numeric(value) {
                Some(n) => Ok(Float(n.to_f64())),
                None => Err(cast_error(value, target, "not a number")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProtectedValue::{Bool, Bytes, Float, Integer, Text};

    #[test]
    fn test_add_and_mul_on_sequences() {
        assert_eq!(
            binary(BinaryOp::Add, &Text("foo".into()), &Text("bar".into())).unwrap(),
            Text("foobar".into())
        );
        assert_eq!(
            binary(BinaryOp::Mul, &Integer(2), &Text("ab".into())).unwrap(),
            Text("abab".into())
        );
        assert_eq!(
            binary(BinaryOp::Mul, &Bytes(vec![1]), &Integer(-3)).unwrap(),
            Bytes(vec![])
        );
        assert!(binary(BinaryOp::Add, &Text("a".into()), &Integer(1)).is_err());
    }

    #[test]
    fn test_oversized_repetition_is_an_error() {
        for (sequence, count) in [
            (Text("ab".into()), Integer(i128::MAX)),
            (Bytes(vec![1, 2]), Integer(i128::MAX)),
            (Text("ab".into()), Integer(i128::from(u64::MAX))),
        ] {
            match binary(BinaryOp::Mul, &sequence, &count) {
                Err(SecretError::Operation { op, reason }) => {
                    assert_eq!(op, "mul");
                    assert_eq!(reason, "repeated sequence is too long");
                }
                other => panic!("expected an operation error, got {:?}", other),
            }
            assert!(binary(BinaryOp::Mul, &count, &sequence).is_err());
        }

        // Nothing to allocate, whatever the count
        assert_eq!(
            binary(BinaryOp::Mul, &Text(String::new()), &Integer(i128::MAX)).unwrap(),
            Text(String::new())
        );
        assert_eq!(
            binary(BinaryOp::Mul, &Bytes(vec![7]), &Bool(true)).unwrap(),
            Bytes(vec![7])
        );
    }

    #[test]
    fn test_floor_semantics() {
        assert_eq!(
            binary(BinaryOp::FloorDiv, &Integer(-7), &Integer(2)).unwrap(),
            Integer(-4)
        );
        assert_eq!(
            binary(BinaryOp::Mod, &Integer(-7), &Integer(2)).unwrap(),
            Integer(1)
        );
        assert_eq!(
            binary(BinaryOp::Mod, &Integer(7), &Integer(-2)).unwrap(),
            Integer(-1)
        );
        assert_eq!(
            div_mod(&Integer(17), &Integer(5)).unwrap(),
            (Integer(3), Integer(2))
        );
        assert_eq!(
            binary(BinaryOp::Mod, &Float(-7.0), &Float(2.0)).unwrap(),
            Float(1.0)
        );
    }

    #[test]
    fn test_division_results() {
        assert_eq!(
            binary(BinaryOp::TrueDiv, &Integer(7), &Integer(2)).unwrap(),
            Float(3.5)
        );
        match binary(BinaryOp::FloorDiv, &Integer(1), &Integer(0)) {
            Err(SecretError::Operation { op, reason }) => {
                assert_eq!(op, "floor_div");
                assert_eq!(reason, "division by zero");
            }
            other => panic!("expected division by zero, got {:?}", other),
        }
    }

    #[test]
    fn test_overflow_is_reported() {
        assert!(binary(BinaryOp::Add, &Integer(i128::MAX), &Integer(1)).is_err());
        assert!(binary(BinaryOp::Shl, &Integer(1), &Integer(127)).is_err());
        assert!(binary(BinaryOp::Pow, &Integer(10), &Integer(100)).is_err());
        assert!(unary(UnaryOp::Neg, &Integer(i128::MIN)).is_err());
    }

    #[test]
    fn test_shifts() {
        assert_eq!(
            binary(BinaryOp::Shl, &Integer(100), &Integer(4)).unwrap(),
            Integer(1600)
        );
        assert_eq!(
            binary(BinaryOp::Shr, &Integer(-1), &Integer(200)).unwrap(),
            Integer(-1)
        );
        assert!(binary(BinaryOp::Shr, &Integer(1), &Integer(-1)).is_err());
        assert!(binary(BinaryOp::Shl, &Float(1.0), &Integer(1)).is_err());
    }

    #[test]
    fn test_pow() {
        assert_eq!(
            binary(BinaryOp::Pow, &Integer(2), &Integer(10)).unwrap(),
            Integer(1024)
        );
        assert_eq!(
            binary(BinaryOp::Pow, &Integer(2), &Integer(-1)).unwrap(),
            Float(0.5)
        );
        assert!(binary(BinaryOp::Pow, &Integer(0), &Integer(-1)).is_err());
    }

    #[test]
    fn test_bool_arithmetic() {
        assert_eq!(
            binary(BinaryOp::Add, &Bool(true), &Integer(1)).unwrap(),
            Integer(2)
        );
        assert_eq!(
            binary(BinaryOp::BitAnd, &Bool(true), &Bool(false)).unwrap(),
            Bool(false)
        );
        assert_eq!(unary(UnaryOp::Invert, &Bool(true)).unwrap(), Integer(-2));
    }

    #[test]
    fn test_unary_on_floats() {
        assert_eq!(unary(UnaryOp::Round, &Float(2.5)).unwrap(), Integer(2));
        assert_eq!(unary(UnaryOp::Floor, &Float(-0.5)).unwrap(), Integer(-1));
        assert_eq!(unary(UnaryOp::Ceil, &Float(0.2)).unwrap(), Integer(1));
        assert!(unary(UnaryOp::Trunc, &Float(f64::NAN)).is_err());
        assert!(unary(UnaryOp::Neg, &Text("x".into())).is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(ordering(CompareOp::Lt, &Integer(1), &Integer(2)).unwrap());
        assert!(ordering(CompareOp::Le, &Integer(2), &Float(2.0)).unwrap());
        assert!(!ordering(CompareOp::Gt, &Float(f64::NAN), &Integer(0)).unwrap());
        assert!(ordering(CompareOp::Ge, &Text("b".into()), &Text("a".into())).unwrap());
        assert!(ordering(CompareOp::Lt, &Text("b".into()), &Integer(1)).is_err());
    }

    #[test]
    fn test_casts() {
        assert_eq!(
            cast(&Text("ff".into()), Kind::Integer, &[Native::Integer(16)]).unwrap(),
            Integer(255)
        );
        assert_eq!(
            cast(&Integer(42), Kind::Text, &[]).unwrap(),
            Text("42".into())
        );
        assert_eq!(
            cast(&Float(1.0), Kind::Text, &[]).unwrap(),
            Text("1.0".into())
        );
        assert_eq!(
            cast(&Bytes(b"2.5".to_vec()), Kind::Float, &[]).unwrap(),
            Float(2.5)
        );
        assert_eq!(cast(&Integer(0), Kind::Bool, &[]).unwrap(), Bool(false));
        assert_eq!(cast(&Float(-2.9), Kind::Integer, &[]).unwrap(), Integer(-2));

        assert!(matches!(
            cast(&Text("abc".into()), Kind::Integer, &[]),
            Err(SecretError::Cast { .. })
        ));
        assert!(matches!(
            cast(&Bytes(vec![0xff, 0xfe]), Kind::Text, &[]),
            Err(SecretError::Cast { .. })
        ));
        assert!(matches!(
            cast(&Integer(3), Kind::Bytes, &[]),
            Err(SecretError::Cast { .. })
        ));
        assert!(matches!(
            cast(&Text("x".into()), Kind::Bytes, &[Native::from("latin-1")]),
            Err(SecretError::Cast { .. })
        ));
    }

    #[test]
    fn test_truthy_and_repr() {
        assert!(!truthy(&Text(String::new())));
        assert!(truthy(&Bytes(vec![0])));
        assert!(!truthy(&Float(0.0)));
        assert_eq!(repr(&Bool(true)).as_str(), "true");
        assert_eq!(repr(&Integer(-5)).as_str(), "-5");
    }
}
