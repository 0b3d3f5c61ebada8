//! The canonical SNBT printer. Output is deterministic (compound keys are
//! sorted bytewise), compact, and always reparses to the same tree.

use std::fmt::Write;

use crate::Value;

/// Print a value as canonical SNBT.
pub fn to_string(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    let mut itoa = itoa::Buffer::new();
    let mut ryu = ryu::Buffer::new();
    match value {
        Value::Byte(v) => {
            out.push_str(itoa.format(*v));
            out.push('b');
        }
        Value::Short(v) => {
            out.push_str(itoa.format(*v));
            out.push('s');
        }
        Value::Int(v) => out.push_str(itoa.format(*v)),
        Value::Long(v) => {
            out.push_str(itoa.format(*v));
            out.push('L');
        }
        Value::Float(v) => {
            out.push_str(ryu.format(*v));
            out.push('f');
        }
        Value::Double(v) => {
            out.push_str(ryu.format(*v));
            out.push('d');
        }
        Value::String(s) => write_string(out, s),
        Value::ByteArray(v) => {
            out.push_str("[B;");
            for (i, n) in v.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(itoa.format(*n));
                out.push('b');
            }
            out.push(']');
        }
        Value::IntArray(v) => {
            out.push_str("[I;");
            for (i, n) in v.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(itoa.format(*n));
            }
            out.push(']');
        }
        Value::LongArray(v) => {
            out.push_str("[L;");
            for (i, n) in v.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(itoa.format(*n));
                out.push('L');
            }
            out.push(']');
        }
        Value::List(list) => {
            out.push('[');
            for (i, el) in list.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, el);
            }
            out.push(']');
        }
        Value::Compound(compound) => {
            let mut entries: Vec<(&String, &Value)> = compound.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, el)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_value(out, el);
            }
            out.push('}');
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    if is_bare(s) {
        out.push_str(s);
    } else {
        write_quoted(out, s);
    }
}

// A string prints bare only when the grammar would read it back as the same
// string: made of bare-token characters, and not something the number or
// boolean rules would claim first.
fn is_bare(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(is_bare_char)
        && !s.eq_ignore_ascii_case("true")
        && !s.eq_ignore_ascii_case("false")
        && !claimed_by_number(s)
}

fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

// Mirrors the number rule's commit condition: a leading digit, or a sign
// followed by a digit or dot-digit.
fn claimed_by_number(s: &str) -> bool {
    let b = s.as_bytes();
    let i = match b.first().copied() {
        Some(b'+' | b'-') => 1,
        _ => 0,
    };
    match b.get(i).copied() {
        Some(c) if c.is_ascii_digit() => true,
        Some(b'.') => b.get(i + 1).map_or(false, |c| c.is_ascii_digit()),
        _ => false,
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if (0x80..=0x9f).contains(&(c as u32)) => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
