//! Statically enumerated native members, per kind.
//!
//! A forwarded call looks its name up in the table for the plaintext's kind.
//! Entries are either invokable methods or plain constants; constants exist
//! only so that forwarding them reports a missing attribute rather than
//! silently succeeding.

use crate::error::{Result, SecretError};
use crate::native;
use crate::value::{Kind, Native, ProtectedValue};

type MemberFn = fn(&ProtectedValue, &[Native]) -> Result<Native>;

#[derive(Clone, Copy)]
pub(crate) enum Member {
    Method(MemberFn),
    Field,
}

const STR_MEMBERS: &[(&str, Member)] = &[
    ("is_alphanumeric", Member::Method(str_is_alphanumeric)),
    ("is_alphabetic", Member::Method(str_is_alphabetic)),
    ("is_numeric", Member::Method(str_is_numeric)),
    ("is_ascii", Member::Method(str_is_ascii)),
    ("is_lowercase", Member::Method(str_is_lowercase)),
    ("is_uppercase", Member::Method(str_is_uppercase)),
    ("is_whitespace", Member::Method(str_is_whitespace)),
    ("to_uppercase", Member::Method(str_to_uppercase)),
    ("to_lowercase", Member::Method(str_to_lowercase)),
    ("trim", Member::Method(str_trim)),
    ("trim_start", Member::Method(str_trim_start)),
    ("trim_end", Member::Method(str_trim_end)),
    ("starts_with", Member::Method(str_starts_with)),
    ("ends_with", Member::Method(str_ends_with)),
    ("contains", Member::Method(str_contains)),
    ("count_matches", Member::Method(str_count_matches)),
    ("replace", Member::Method(str_replace)),
    ("repeat", Member::Method(str_repeat)),
    ("len", Member::Method(str_len)),
    ("split", Member::Method(str_split)),
    ("chars", Member::Method(str_chars)),
];

const BYTES_MEMBERS: &[(&str, Member)] = &[
    ("is_ascii", Member::Method(bytes_is_ascii)),
    ("to_ascii_uppercase", Member::Method(bytes_to_ascii_uppercase)),
    ("to_ascii_lowercase", Member::Method(bytes_to_ascii_lowercase)),
    ("starts_with", Member::Method(bytes_starts_with)),
    ("ends_with", Member::Method(bytes_ends_with)),
    ("len", Member::Method(bytes_len)),
    ("to_hex", Member::Method(bytes_to_hex)),
    ("chunks", Member::Method(bytes_chunks)),
];

const INT_MEMBERS: &[(&str, Member)] = &[
    ("count_ones", Member::Method(int_count_ones)),
    ("count_zeros", Member::Method(int_count_zeros)),
    ("leading_zeros", Member::Method(int_leading_zeros)),
    ("trailing_zeros", Member::Method(int_trailing_zeros)),
    ("is_positive", Member::Method(int_is_positive)),
    ("is_negative", Member::Method(int_is_negative)),
    ("signum", Member::Method(int_signum)),
    ("abs_diff", Member::Method(int_abs_diff)),
    ("to_be_bytes", Member::Method(int_to_be_bytes)),
    ("to_le_bytes", Member::Method(int_to_le_bytes)),
    ("bit_length", Member::Method(int_bit_length)),
    ("MIN", Member::Field),
    ("MAX", Member::Field),
    ("BITS", Member::Field),
];

const FLOAT_MEMBERS: &[(&str, Member)] = &[
    ("is_nan", Member::Method(float_is_nan)),
    ("is_finite", Member::Method(float_is_finite)),
    ("is_infinite", Member::Method(float_is_infinite)),
    ("is_sign_negative", Member::Method(float_is_sign_negative)),
    ("sqrt", Member::Method(float_sqrt)),
    ("fract", Member::Method(float_fract)),
    ("to_bits", Member::Method(float_to_bits)),
    ("powi", Member::Method(float_powi)),
    ("powf", Member::Method(float_powf)),
    ("MIN", Member::Field),
    ("MAX", Member::Field),
    ("EPSILON", Member::Field),
];

fn table(kind: Kind) -> &'static [(&'static str, Member)] {
    match kind {
        Kind::Text => STR_MEMBERS,
        Kind::Bytes => BYTES_MEMBERS,
        Kind::Integer => INT_MEMBERS,
        Kind::Float => FLOAT_MEMBERS,
        Kind::Bool => &[],
    }
}

pub(crate) fn lookup(kind: Kind, name: &str) -> Option<Member> {
    table(kind)
        .iter()
        .find(|(member, _)| *member == name)
        .map(|(_, member)| *member)
}

/// Invokes the member `name` of the plaintext's native kind.
///
/// # Errors
///
/// * `SecretError::Attribute` - If `name` is unknown or is not invokable
/// * `SecretError::Operation` - If the arguments do not fit the member
pub(crate) fn invoke(value: &ProtectedValue, name: &str, args: &[Native]) -> Result<Native> {
    match lookup(value.kind(), name) {
        Some(Member::Method(method)) => method(value, args),
        Some(Member::Field) | None => Err(SecretError::Attribute {
            kind: value.kind(),
            name: name.to_owned(),
        }),
    }
}

fn arity(op: &'static str, args: &[Native], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(SecretError::operation(
            op,
            format!("expected {} argument(s), got {}", expected, args.len()),
        ))
    }
}

fn wrong_arg(op: &'static str, expected: &str, got: &Native) -> SecretError {
    SecretError::operation(
        op,
        format!("expected a {} argument, got {}", expected, got.type_name()),
    )
}

fn text_arg<'a>(op: &'static str, args: &'a [Native], index: usize) -> Result<&'a str> {
    match &args[index] {
        Native::Text(s) => Ok(s),
        other => Err(wrong_arg(op, "str", other)),
    }
}

fn bytes_arg<'a>(op: &'static str, args: &'a [Native], index: usize) -> Result<&'a [u8]> {
    match &args[index] {
        Native::Bytes(b) => Ok(b),
        other => Err(wrong_arg(op, "bytes", other)),
    }
}

fn int_arg(op: &'static str, args: &[Native], index: usize) -> Result<i128> {
    match &args[index] {
        Native::Integer(i) => Ok(*i),
        other => Err(wrong_arg(op, "int", other)),
    }
}

fn float_arg(op: &'static str, args: &[Native], index: usize) -> Result<f64> {
    match &args[index] {
        Native::Float(f) => Ok(*f),
        Native::Integer(i) => Ok(*i as f64),
        other => Err(wrong_arg(op, "float", other)),
    }
}

fn receiver_mismatch(op: &'static str, value: &ProtectedValue) -> SecretError {
    SecretError::operation(op, format!("not defined for {}", value.kind()))
}

fn text<'a>(op: &'static str, value: &'a ProtectedValue) -> Result<&'a str> {
    value.as_text().ok_or_else(|| receiver_mismatch(op, value))
}

fn bytes<'a>(op: &'static str, value: &'a ProtectedValue) -> Result<&'a [u8]> {
    value.as_bytes().ok_or_else(|| receiver_mismatch(op, value))
}

fn int(op: &'static str, value: &ProtectedValue) -> Result<i128> {
    value.as_integer().ok_or_else(|| receiver_mismatch(op, value))
}

fn float(op: &'static str, value: &ProtectedValue) -> Result<f64> {
    value.as_float().ok_or_else(|| receiver_mismatch(op, value))
}

fn count(op: &'static str, n: impl TryInto<i128>) -> Result<Native> {
    n.try_into()
        .map(Native::Integer)
        .map_err(|_| SecretError::operation(op, "integer overflow"))
}

macro_rules! str_predicate {
    ($name:ident, $op:literal, |$s:ident| $body:expr) => {
        fn $name(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
            arity($op, args, 0)?;
            let $s = text($op, value)?;
            Ok(Native::Bool($body))
        }
    };
}

// str

str_predicate!(str_is_alphanumeric, "is_alphanumeric", |s| !s.is_empty()
    && s.chars().all(char::is_alphanumeric));
str_predicate!(str_is_alphabetic, "is_alphabetic", |s| !s.is_empty()
    && s.chars().all(char::is_alphabetic));
str_predicate!(str_is_numeric, "is_numeric", |s| !s.is_empty()
    && s.chars().all(char::is_numeric));
str_predicate!(str_is_ascii, "is_ascii", |s| s.is_ascii());
str_predicate!(str_is_lowercase, "is_lowercase", |s| s
    .chars()
    .any(char::is_alphabetic)
    && !s.chars().any(char::is_uppercase));
str_predicate!(str_is_uppercase, "is_uppercase", |s| s
    .chars()
    .any(char::is_alphabetic)
    && !s.chars().any(char::is_lowercase));
str_predicate!(str_is_whitespace, "is_whitespace", |s| !s.is_empty()
    && s.chars().all(char::is_whitespace));

macro_rules! str_transform {
    ($name:ident, $op:literal, |$s:ident| $body:expr) => {
        fn $name(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
            arity($op, args, 0)?;
            let $s = text($op, value)?;
            Ok(Native::Text($body))
        }
    };
}

str_transform!(str_to_uppercase, "to_uppercase", |s| s.to_uppercase());
str_transform!(str_to_lowercase, "to_lowercase", |s| s.to_lowercase());
str_transform!(str_trim, "trim", |s| s.trim().to_owned());
str_transform!(str_trim_start, "trim_start", |s| s.trim_start().to_owned());
str_transform!(str_trim_end, "trim_end", |s| s.trim_end().to_owned());

fn str_starts_with(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("starts_with", args, 1)?;
    let pattern = text_arg("starts_with", args, 0)?;
    Ok(Native::Bool(text("starts_with", value)?.starts_with(pattern)))
}

fn str_ends_with(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("ends_with", args, 1)?;
    let pattern = text_arg("ends_with", args, 0)?;
    Ok(Native::Bool(text("ends_with", value)?.ends_with(pattern)))
}

fn str_contains(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("contains", args, 1)?;
    let pattern = text_arg("contains", args, 0)?;
    Ok(Native::Bool(text("contains", value)?.contains(pattern)))
}

fn str_count_matches(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("count_matches", args, 1)?;
    let pattern = text_arg("count_matches", args, 0)?;
    if pattern.is_empty() {
        return Err(SecretError::operation("count_matches", "empty pattern"));
    }
    count(
        "count_matches",
        text("count_matches", value)?.matches(pattern).count(),
    )
}

fn str_replace(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("replace", args, 2)?;
    let from = text_arg("replace", args, 0)?;
    let to = text_arg("replace", args, 1)?;
    Ok(Native::Text(text("replace", value)?.replace(from, to)))
}

fn str_repeat(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("repeat", args, 1)?;
    let n = int_arg("repeat", args, 0)?;
    native::repeat_text("repeat", text("repeat", value)?, n).map(Native::Text)
}

fn str_len(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("len", args, 0)?;
    count("len", text("len", value)?.chars().count())
}

fn str_split(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    let s = text("split", value)?;
    let parts: Vec<Native> = match args {
        [] => s.split_whitespace().map(Native::from).collect(),
        _ => {
            arity("split", args, 1)?;
            let separator = text_arg("split", args, 0)?;
            if separator.is_empty() {
                return Err(SecretError::operation("split", "empty separator"));
            }
            s.split(separator).map(Native::from).collect()
        }
    };
    Ok(Native::List(parts))
}

fn str_chars(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("chars", args, 0)?;
    Ok(Native::List(
        text("chars", value)?
            .chars()
            .map(|c| Native::Text(c.to_string()))
            .collect(),
    ))
}

// bytes

fn bytes_is_ascii(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("is_ascii", args, 0)?;
    Ok(Native::Bool(bytes("is_ascii", value)?.is_ascii()))
}

fn bytes_to_ascii_uppercase(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("to_ascii_uppercase", args, 0)?;
    Ok(Native::Bytes(
        bytes("to_ascii_uppercase", value)?.to_ascii_uppercase(),
    ))
}

fn bytes_to_ascii_lowercase(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("to_ascii_lowercase", args, 0)?;
    Ok(Native::Bytes(
        bytes("to_ascii_lowercase", value)?.to_ascii_lowercase(),
    ))
}

fn bytes_starts_with(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("starts_with", args, 1)?;
    let prefix = bytes_arg("starts_with", args, 0)?;
    Ok(Native::Bool(bytes("starts_with", value)?.starts_with(prefix)))
}

fn bytes_ends_with(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("ends_with", args, 1)?;
    let suffix = bytes_arg("ends_with", args, 0)?;
    Ok(Native::Bool(bytes("ends_with", value)?.ends_with(suffix)))
}

fn bytes_len(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("len", args, 0)?;
    count("len", bytes("len", value)?.len())
}

fn bytes_to_hex(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("to_hex", args, 0)?;
    Ok(Native::Text(hex::encode(bytes("to_hex", value)?)))
}

fn bytes_chunks(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("chunks", args, 1)?;
    let size = int_arg("chunks", args, 0)?;
    let size = usize::try_from(size)
        .ok()
        .filter(|size| *size > 0)
        .ok_or_else(|| SecretError::operation("chunks", "chunk size must be positive"))?;
    Ok(Native::List(
        bytes("chunks", value)?
            .chunks(size)
            .map(|chunk| Native::Bytes(chunk.to_vec()))
            .collect(),
    ))
}

// int

macro_rules! int_unary {
    ($name:ident, $op:literal, |$i:ident| $body:expr) => {
        fn $name(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
            arity($op, args, 0)?;
            let $i = int($op, value)?;
            Ok($body)
        }
    };
}

int_unary!(int_count_ones, "count_ones", |i| Native::Integer(
    i.count_ones().into()
));
int_unary!(int_count_zeros, "count_zeros", |i| Native::Integer(
    i.count_zeros().into()
));
int_unary!(int_leading_zeros, "leading_zeros", |i| Native::Integer(
    i.leading_zeros().into()
));
int_unary!(int_trailing_zeros, "trailing_zeros", |i| Native::Integer(
    i.trailing_zeros().into()
));
int_unary!(int_is_positive, "is_positive", |i| Native::Bool(i.is_positive()));
int_unary!(int_is_negative, "is_negative", |i| Native::Bool(i.is_negative()));
int_unary!(int_signum, "signum", |i| Native::Integer(i.signum()));
int_unary!(int_to_be_bytes, "to_be_bytes", |i| Native::Bytes(
    i.to_be_bytes().to_vec()
));
int_unary!(int_to_le_bytes, "to_le_bytes", |i| Native::Bytes(
    i.to_le_bytes().to_vec()
));
int_unary!(int_bit_length, "bit_length", |i| Native::Integer(
    (u128::BITS - i.unsigned_abs().leading_zeros()).into()
));

fn int_abs_diff(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("abs_diff", args, 1)?;
    let other = int_arg("abs_diff", args, 0)?;
    count("abs_diff", int("abs_diff", value)?.abs_diff(other))
}

// float

macro_rules! float_unary {
    ($name:ident, $op:literal, |$f:ident| $body:expr) => {
        fn $name(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
            arity($op, args, 0)?;
            let $f = float($op, value)?;
            Ok($body)
        }
    };
}

float_unary!(float_is_nan, "is_nan", |f| Native::Bool(f.is_nan()));
float_unary!(float_is_finite, "is_finite", |f| Native::Bool(f.is_finite()));
float_unary!(float_is_infinite, "is_infinite", |f| Native::Bool(
    f.is_infinite()
));
float_unary!(float_is_sign_negative, "is_sign_negative", |f| Native::Bool(
    f.is_sign_negative()
));
float_unary!(float_sqrt, "sqrt", |f| Native::Float(f.sqrt()));
float_unary!(float_fract, "fract", |f| Native::Float(f.fract()));
float_unary!(float_to_bits, "to_bits", |f| Native::Integer(
    f.to_bits().into()
));

fn float_powi(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("powi", args, 1)?;
    let exponent = i32::try_from(int_arg("powi", args, 0)?)
        .map_err(|_| SecretError::operation("powi", "exponent out of range"))?;
    Ok(Native::Float(float("powi", value)?.powi(exponent)))
}

fn float_powf(value: &ProtectedValue, args: &[Native]) -> Result<Native> {
    arity("powf", args, 1)?;
    let exponent = float_arg("powf", args, 0)?;
    Ok(Native::Float(float("powf", value)?.powf(exponent)))
}
