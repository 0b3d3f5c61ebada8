//! The SNBT grammar. Rules dispatch on the first character of the remaining
//! input: `{` opens a compound, `[` a list or typed array, a quote a string,
//! a digit (or a sign or dot followed by a digit) a number, and anything else
//! is a bare token. A sign that is not followed by a digit backtracks to the
//! bare-token rule; once a digit has been consumed the number rule commits,
//! and malformed input from there on is a hard error rather than a string.

use nom::character::complete::multispace0;
use nom::error::ParseError;
use nom::{Err, IResult};

use crate::error::{Error, Result};
use crate::{Compound, List, Value};

/// Grammar failure carrying the remaining input, so the offset (and from it
/// the line and column) can be recovered against the full source.
#[derive(Debug)]
pub(crate) struct SnbtError<'a> {
    input: &'a str,
    msg: String,
}

impl<'a> SnbtError<'a> {
    fn new(input: &'a str, msg: impl Into<String>) -> Self {
        SnbtError {
            input,
            msg: msg.into(),
        }
    }
}

impl<'a> ParseError<&'a str> for SnbtError<'a> {
    fn from_error_kind(input: &'a str, kind: nom::error::ErrorKind) -> Self {
        SnbtError::new(input, kind.description())
    }

    fn append(_input: &'a str, _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

type PResult<'a, T> = IResult<&'a str, T, SnbtError<'a>>;

/// Parse a complete SNBT document. Trailing non-whitespace input is an
/// error.
pub(crate) fn parse(source: &str) -> Result<Value> {
    let parsed = (|| {
        let (rest, _) = multispace0(source)?;
        let (rest, value) = value(rest)?;
        let (rest, _) = multispace0(rest)?;
        Ok((rest, value))
    })();
    match parsed {
        Ok(("", value)) => Ok(value),
        Ok((rest, _)) => Err(position(source, rest, "trailing characters after value")),
        Err(Err::Error(e)) | Err(Err::Failure(e)) => Err(position(source, e.input, &e.msg)),
        Err(Err::Incomplete(_)) => Err(Error::unexpected_eof()),
    }
}

fn position(source: &str, remaining: &str, msg: &str) -> Error {
    let offset = source.len() - remaining.len();
    let consumed = &source[..offset];
    let line = consumed.matches('\n').count() as u32 + 1;
    let column = consumed
        .rsplit('\n')
        .next()
        .unwrap_or("")
        .chars()
        .count() as u32
        + 1;
    Error::syntax(line, column, msg)
}

fn failure<'a, T>(input: &'a str, msg: impl Into<String>) -> PResult<'a, T> {
    Err(Err::Failure(SnbtError::new(input, msg)))
}

// Like nom's cut: once inside a container the element grammar may no longer
// backtrack.
fn commit(e: Err<SnbtError>) -> Err<SnbtError> {
    match e {
        Err::Error(e) => Err::Failure(e),
        other => other,
    }
}

fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

fn value(input: &str) -> PResult<Value> {
    match input.chars().next() {
        None => Err(Err::Error(SnbtError::new(input, "expected a value"))),
        Some('{') => compound(input),
        Some('[') => list_or_array(input),
        Some('"') | Some('\'') => {
            let (rest, s) = quoted_string(input)?;
            Ok((rest, Value::String(s)))
        }
        Some(c) if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => match number(input) {
            Err(Err::Error(_)) => bare_or_call(input),
            other => other,
        },
        Some(_) => bare_or_call(input),
    }
}

// ---------------- compounds ----------------

fn compound(input: &str) -> PResult<Value> {
    let (rest, _) = multispace0(&input[1..])?;
    if let Some(rest) = rest.strip_prefix('}') {
        return Ok((rest, Value::Compound(Compound::new())));
    }
    let mut out = Compound::new();
    let mut rest = rest;
    loop {
        let (r, k) = key(rest)?;
        let (r, _) = multispace0(r)?;
        let r = expect(r, ':')?;
        let (r, _) = multispace0(r)?;
        let (r, v) = value(r).map_err(commit)?;
        out.insert(k, v);
        let (r, _) = multispace0(r)?;
        if let Some(r) = r.strip_prefix(',') {
            let (r, _) = multispace0(r)?;
            rest = r;
        } else if let Some(r) = r.strip_prefix('}') {
            return Ok((r, Value::Compound(out)));
        } else {
            return failure(r, "expected ',' or '}' in compound");
        }
    }
}

fn key(input: &str) -> PResult<String> {
    let (rest, k) = match input.chars().next() {
        Some('"') | Some('\'') => quoted_string(input)?,
        _ => match bare_token(input) {
            Ok((rest, t)) => (rest, t.to_owned()),
            Err(_) => return failure(input, "expected a key"),
        },
    };
    if k.is_empty() {
        return failure(input, "compound keys may not be empty");
    }
    Ok((rest, k))
}

fn expect(input: &str, c: char) -> std::result::Result<&str, Err<SnbtError<'_>>> {
    match input.strip_prefix(c) {
        Some(rest) => Ok(rest),
        None => Err(Err::Failure(SnbtError::new(
            input,
            format!("expected '{}'", c),
        ))),
    }
}

// ---------------- lists and arrays ----------------

fn list_or_array(input: &str) -> PResult<Value> {
    let rest = &input[1..];
    if let Some(rest) = rest.strip_prefix("B;") {
        let (rest, v) = array_body(rest, "invalid byte array element", |el| match el {
            Value::Byte(b) => Some(*b),
            Value::Int(n) => i8::try_from(*n).ok(),
            _ => None,
        })?;
        return Ok((rest, Value::ByteArray(v)));
    }
    if let Some(rest) = rest.strip_prefix("I;") {
        let (rest, v) = array_body(rest, "invalid int array element", |el| match el {
            Value::Int(n) => Some(*n),
            _ => None,
        })?;
        return Ok((rest, Value::IntArray(v)));
    }
    if let Some(rest) = rest.strip_prefix("L;") {
        let (rest, v) = array_body(rest, "invalid long array element", |el| match el {
            Value::Long(n) => Some(*n),
            Value::Int(n) => Some(*n as i64),
            _ => None,
        })?;
        return Ok((rest, Value::LongArray(v)));
    }
    let (rest, _) = multispace0(rest)?;
    if let Some(rest) = rest.strip_prefix(']') {
        return Ok((rest, Value::List(List::new())));
    }
    let mut out = List::new();
    let mut rest = rest;
    loop {
        let (r, v) = value(rest).map_err(commit)?;
        out.push(v);
        let (r, _) = multispace0(r)?;
        if let Some(r) = r.strip_prefix(',') {
            let (r, _) = multispace0(r)?;
            rest = r;
        } else if let Some(r) = r.strip_prefix(']') {
            return Ok((r, Value::List(out)));
        } else {
            return failure(r, "expected ',' or ']' in list");
        }
    }
}

// Elements of a typed array must hold the declared width: a literal of the
// matching variant, or a plain int that fits. Anything else, including a
// conflicting suffix, fails at the offending element.
fn array_body<'a, T>(
    input: &'a str,
    kind: &'static str,
    convert: impl Fn(&Value) -> Option<T>,
) -> PResult<'a, Vec<T>> {
    let (rest, _) = multispace0(input)?;
    if let Some(rest) = rest.strip_prefix(']') {
        return Ok((rest, Vec::new()));
    }
    let mut out = Vec::new();
    let mut rest = rest;
    loop {
        let at = rest;
        let (r, v) = value(rest).map_err(commit)?;
        match convert(&v) {
            Some(t) => out.push(t),
            None => return failure(at, kind),
        }
        let (r, _) = multispace0(r)?;
        if let Some(r) = r.strip_prefix(',') {
            let (r, _) = multispace0(r)?;
            rest = r;
        } else if let Some(r) = r.strip_prefix(']') {
            return Ok((r, out));
        } else {
            return failure(r, "expected ',' or ']' in array");
        }
    }
}

// ---------------- strings ----------------

fn quoted_string(input: &str) -> PResult<String> {
    let quote = match input.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err(Err::Error(SnbtError::new(input, "expected a string"))),
    };
    let mut out = String::new();
    let mut i = 1;
    loop {
        let rest = &input[i..];
        let c = match rest.chars().next() {
            Some(c) => c,
            None => return failure(rest, "unterminated string"),
        };
        if c == quote {
            return Ok((&input[i + 1..], out));
        }
        if c == '\\' {
            i += 1 + escape(&rest[1..], &mut out)?;
        } else {
            out.push(c);
            i += c.len_utf8();
        }
    }
}

/// Handle one escape sequence. `rest` starts just after the backslash;
/// returns the number of bytes consumed.
fn escape<'a>(rest: &'a str, out: &mut String) -> std::result::Result<usize, Err<SnbtError<'a>>> {
    let c = match rest.chars().next() {
        Some(c) => c,
        None => return Err(Err::Failure(SnbtError::new(rest, "unterminated escape"))),
    };
    match c {
        '\\' | '\'' | '"' => {
            out.push(c);
            Ok(1)
        }
        'b' => {
            out.push('\u{0008}');
            Ok(1)
        }
        'f' => {
            out.push('\u{000c}');
            Ok(1)
        }
        'n' => {
            out.push('\n');
            Ok(1)
        }
        'r' => {
            out.push('\r');
            Ok(1)
        }
        't' => {
            out.push('\t');
            Ok(1)
        }
        's' => {
            out.push(' ');
            Ok(1)
        }
        'x' => {
            out.push(codepoint(rest, 2)?);
            Ok(3)
        }
        'u' => {
            out.push(codepoint(rest, 4)?);
            Ok(5)
        }
        'U' => {
            out.push(codepoint(rest, 8)?);
            Ok(9)
        }
        'N' => {
            let body = &rest[1..];
            if !body.starts_with('{') {
                return Err(Err::Failure(SnbtError::new(body, "expected '{' after \\N")));
            }
            let close = match body[1..].find('}') {
                Some(at) => at,
                None => return Err(Err::Failure(SnbtError::new(body, "unterminated \\N escape"))),
            };
            let name = &body[1..1 + close];
            match unicode_names2::character(name) {
                Some(named) => out.push(named),
                None => {
                    return Err(Err::Failure(SnbtError::new(
                        body,
                        format!("unknown character name '{}'", name),
                    )))
                }
            }
            Ok(1 + 1 + close + 1)
        }
        _ => Err(Err::Failure(SnbtError::new(rest, "unknown escape sequence"))),
    }
}

/// `rest` starts at the escape letter (`x`, `u` or `U`); `len` fixed-width
/// hex digits follow it.
fn codepoint<'a>(rest: &'a str, len: usize) -> std::result::Result<char, Err<SnbtError<'a>>> {
    let hex = match rest.get(1..1 + len) {
        Some(hex) => hex,
        None => return Err(Err::Failure(SnbtError::new(rest, "truncated escape"))),
    };
    let n = u32::from_str_radix(hex, 16)
        .map_err(|_| Err::Failure(SnbtError::new(rest, "invalid hex digits in escape")))?;
    char::from_u32(n).ok_or_else(|| {
        Err::Failure(SnbtError::new(
            rest,
            format!("\\{} escape is not a valid code point", &rest[..1]),
        ))
    })
}

// ---------------- bare tokens and built-ins ----------------

fn bare_token(input: &str) -> PResult<&str> {
    let end = input
        .find(|c: char| !is_bare_char(c))
        .unwrap_or(input.len());
    if end == 0 {
        return Err(Err::Error(SnbtError::new(input, "expected a value")));
    }
    Ok((&input[end..], &input[..end]))
}

fn bare_or_call(input: &str) -> PResult<Value> {
    let (rest, token) = bare_token(input)?;
    if token.eq_ignore_ascii_case("true") {
        return Ok((rest, Value::Byte(1)));
    }
    if token.eq_ignore_ascii_case("false") {
        return Ok((rest, Value::Byte(0)));
    }
    if let Some(rest) = rest.strip_prefix('(') {
        return builtin(input, token, rest);
    }
    Ok((rest, Value::String(token.to_owned())))
}

// Call-like operations. `bool(x)` collapses any numeric argument to a byte
// flag; `uuid("...")` expands a hyphenated UUID to the 4-int array layout
// it is stored as.
fn builtin<'a>(input: &'a str, name: &str, rest: &'a str) -> PResult<'a, Value> {
    let (rest, _) = multispace0(rest)?;
    match name {
        "bool" => {
            let at = rest;
            let (rest, arg) = value(rest).map_err(commit)?;
            let (rest, _) = multispace0(rest)?;
            let rest = expect(rest, ')')?;
            match arg.as_f64() {
                Some(n) => Ok((rest, Value::Byte(i8::from(n != 0.0)))),
                None => failure(at, "bool() expects a numeric argument"),
            }
        }
        "uuid" => {
            let at = rest;
            let (rest, arg) = match rest.chars().next() {
                Some('"') | Some('\'') => quoted_string(rest)?,
                _ => match bare_token(rest) {
                    Ok((rest, t)) => (rest, t.to_owned()),
                    Err(_) => return failure(rest, "uuid() expects a string argument"),
                },
            };
            let (rest, _) = multispace0(rest)?;
            let rest = expect(rest, ')')?;
            match parse_uuid(&arg) {
                Some(ints) => Ok((rest, Value::IntArray(ints.to_vec()))),
                None => failure(at, "uuid() expects a hyphenated uuid"),
            }
        }
        _ => failure(input, format!("unknown operation '{}'", name)),
    }
}

fn parse_uuid(text: &str) -> Option<[i32; 4]> {
    let hex: String = text.chars().filter(|&c| c != '-').collect();
    if hex.len() != 32 {
        return None;
    }
    let n = u128::from_str_radix(&hex, 16).ok()?;
    Some([
        (n >> 96) as u32 as i32,
        (n >> 64) as u32 as i32,
        (n >> 32) as u32 as i32,
        n as u32 as i32,
    ])
}

// ---------------- numbers ----------------

#[derive(Clone, Copy)]
enum Width {
    Byte,
    Short,
    Int,
    Long,
}

fn number(input: &str) -> PResult<Value> {
    let bytes = input.as_bytes();
    let mut i = 0;
    let negative = match bytes.first().copied() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    // A sign with nothing numeric after it is a bare token, not a number.
    if !matches!(bytes.get(i).copied(), Some(b'0'..=b'9') | Some(b'.')) {
        return Err(Err::Error(SnbtError::new(input, "expected a number")));
    }

    // Radix prefix, but only when a digit of that radix follows: `0b101` is
    // binary 5 while a lone `0b` is the byte zero.
    if bytes[i] == b'0' {
        let radix = match bytes.get(i + 1).copied() {
            Some(b'b' | b'B') => Some(2),
            Some(b'x' | b'X') => Some(16),
            _ => None,
        };
        if let Some(radix) = radix {
            if bytes
                .get(i + 2)
                .map_or(false, |&b| (b as char).is_digit(radix))
            {
                let (digits, end) = digit_run(input, i + 2, radix)?;
                return integer(input, &input[end..], negative, &digits, radix);
            }
        }
    }

    let mut int_digits = String::new();
    let mut end = i;
    if bytes[i].is_ascii_digit() {
        let (d, e) = digit_run(input, i, 10)?;
        int_digits = d;
        end = e;
    }

    let mut text = String::new();
    if negative {
        text.push('-');
    }
    text.push_str(&int_digits);

    let mut is_float = false;
    if bytes.get(end) == Some(&b'.') {
        let frac_at = end + 1;
        let has_frac = bytes.get(frac_at).map_or(false, |b| b.is_ascii_digit());
        if int_digits.is_empty() && !has_frac {
            // A dot with no digits on either side: bare token.
            return Err(Err::Error(SnbtError::new(input, "expected a number")));
        }
        is_float = true;
        if int_digits.is_empty() {
            text.push('0');
        }
        text.push('.');
        end = frac_at;
        if has_frac {
            let (frac, e) = digit_run(input, frac_at, 10)?;
            text.push_str(&frac);
            end = e;
        } else {
            text.push('0');
        }
    }

    // An exponent also commits to a float, but only when digits follow the
    // `e`; otherwise the `e` is left for the terminator check to reject.
    if matches!(bytes.get(end).copied(), Some(b'e' | b'E')) && !text.is_empty() {
        let mut j = end + 1;
        let exp_negative = bytes.get(j) == Some(&b'-');
        if matches!(bytes.get(j).copied(), Some(b'+' | b'-')) {
            j += 1;
        }
        if bytes.get(j).map_or(false, |b| b.is_ascii_digit()) {
            is_float = true;
            text.push('e');
            if exp_negative {
                text.push('-');
            }
            let (exp, e) = digit_run(input, j, 10)?;
            text.push_str(&exp);
            end = e;
        }
    }

    let rest = &input[end..];
    if is_float {
        return float(input, rest, &text);
    }
    match rest.as_bytes().first().copied() {
        // Integer digits with a float suffix, like `5f`.
        Some(b'f' | b'F' | b'd' | b'D') => float(input, rest, &text),
        _ => {
            if int_digits.len() > 1 && int_digits.starts_with('0') {
                return failure(input, "decimal literals may not have leading zeros");
            }
            integer(input, rest, negative, &int_digits, 10)
        }
    }
}

/// Consume a run of digits in `radix`, with `_` separators allowed between
/// digits. Returns the digits with separators stripped and the end offset.
fn digit_run<'a>(
    input: &'a str,
    start: usize,
    radix: u32,
) -> std::result::Result<(String, usize), Err<SnbtError<'a>>> {
    let bytes = input.as_bytes();
    let mut i = start;
    let mut digits = String::new();
    let mut last_was_digit = false;
    while let Some(&b) = bytes.get(i) {
        let c = b as char;
        if c.is_digit(radix) {
            digits.push(c);
            last_was_digit = true;
            i += 1;
        } else if b == b'_' {
            if !last_was_digit {
                return Err(Err::Failure(SnbtError::new(
                    &input[i..],
                    "misplaced digit separator",
                )));
            }
            last_was_digit = false;
            i += 1;
        } else {
            break;
        }
    }
    if digits.is_empty() {
        return Err(Err::Failure(SnbtError::new(&input[start..], "expected digits")));
    }
    if !last_was_digit {
        return Err(Err::Failure(SnbtError::new(
            &input[i - 1..],
            "misplaced digit separator",
        )));
    }
    Ok((digits, i))
}

/// Apply the integer suffix and range rules. `input` is the whole literal
/// (for error positions), `rest` the input just past the digits.
fn integer<'a>(
    input: &'a str,
    rest: &'a str,
    negative: bool,
    digits: &str,
    radix: u32,
) -> PResult<'a, Value> {
    fn width_of(c: u8) -> Option<Width> {
        match c {
            b'b' | b'B' => Some(Width::Byte),
            b's' | b'S' => Some(Width::Short),
            b'i' | b'I' => Some(Width::Int),
            b'l' | b'L' => Some(Width::Long),
            _ => None,
        }
    }

    let b = rest.as_bytes();
    let (unsigned, width, used) = match b.first().copied() {
        // `u` must introduce a width; `s` alone is the short suffix, but
        // followed by a width it is the explicit signed marker.
        Some(b'u' | b'U') => match b.get(1).and_then(|&c| width_of(c)) {
            Some(w) => (true, w, 2),
            None => return failure(rest, "expected b, s, i or l after unsigned prefix"),
        },
        Some(b's' | b'S') if b.get(1).map_or(false, |&c| width_of(c).is_some()) => {
            match b.get(1).and_then(|&c| width_of(c)) {
                Some(w) => (false, w, 2),
                None => return failure(rest, "expected integer width"),
            }
        }
        Some(c) => match width_of(c) {
            Some(w) => (false, w, 1),
            None => (false, Width::Int, 0),
        },
        None => (false, Width::Int, 0),
    };
    let after = &rest[used..];
    terminated(after)?;

    if unsigned && negative {
        return failure(input, "unsigned suffix cannot take a negative sign");
    }

    let magnitude = match u128::from_str_radix(digits, radix) {
        Ok(n) => n,
        Err(_) => return failure(input, "integer literal out of range"),
    };

    let value = if unsigned {
        let max = match width {
            Width::Byte => u8::MAX as u128,
            Width::Short => u16::MAX as u128,
            Width::Int => u32::MAX as u128,
            Width::Long => u64::MAX as u128,
        };
        if magnitude > max {
            return failure(input, "integer literal out of range");
        }
        match width {
            Width::Byte => Value::Byte(magnitude as u8 as i8),
            Width::Short => Value::Short(magnitude as u16 as i16),
            Width::Int => Value::Int(magnitude as u32 as i32),
            Width::Long => Value::Long(magnitude as u64 as i64),
        }
    } else {
        let limit = match width {
            Width::Byte => i8::MAX as u128,
            Width::Short => i16::MAX as u128,
            Width::Int => i32::MAX as u128,
            Width::Long => i64::MAX as u128,
        };
        let limit = if negative { limit + 1 } else { limit };
        if magnitude > limit {
            return failure(input, "integer literal out of range");
        }
        let signed = if negative {
            (magnitude as i128).wrapping_neg()
        } else {
            magnitude as i128
        };
        match width {
            Width::Byte => Value::Byte(signed as i8),
            Width::Short => Value::Short(signed as i16),
            Width::Int => Value::Int(signed as i32),
            Width::Long => Value::Long(signed as i64),
        }
    };
    Ok((after, value))
}

/// Finish a float literal: `text` is the normalized digits, `rest` the input
/// at the (optional) suffix.
fn float<'a>(input: &'a str, rest: &'a str, text: &str) -> PResult<'a, Value> {
    let (single, used) = match rest.as_bytes().first().copied() {
        Some(b'f' | b'F') => (true, 1),
        Some(b'd' | b'D') => (false, 1),
        _ => (false, 0),
    };
    let after = &rest[used..];
    terminated(after)?;

    if single {
        let v = match text.parse::<f32>() {
            Ok(v) => v,
            Err(_) => return failure(input, "invalid float literal"),
        };
        if !v.is_finite() {
            return failure(input, "float literal is not finite");
        }
        Ok((after, Value::Float(v)))
    } else {
        let v = match text.parse::<f64>() {
            Ok(v) => v,
            Err(_) => return failure(input, "invalid double literal"),
        };
        if !v.is_finite() {
            return failure(input, "double literal is not finite");
        }
        Ok((after, Value::Double(v)))
    }
}

// Number rules have committed by the time this runs, so a bare-token
// character directly after a literal is an error, not a string.
fn terminated(after: &str) -> std::result::Result<(), Err<SnbtError<'_>>> {
    match after.chars().next() {
        Some(c) if is_bare_char(c) => Err(Err::Failure(SnbtError::new(
            after,
            "unexpected character after number",
        ))),
        _ => Ok(()),
    }
}
