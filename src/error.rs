//! Contains the Error and Result type used throughout the crate.
use std::fmt::Display;

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for every fallible operation in this crate. The message is
/// human readable; [`kind`][`Error::kind`] classifies the failure so callers
/// can tell hostile or corrupt input (budget errors) apart from structurally
/// malformed input (format errors) and text syntax errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
}

/// Classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed binary stream, such as a negative payload length or a
    /// nonzero-length list of End tags.
    Format,

    /// A tag byte outside 0..=12.
    InvalidTag(u8),

    /// Input ended part way through a value.
    UnexpectedEof,

    /// The decode byte quota was exhausted.
    BudgetBytes,

    /// The decode nesting depth quota was exhausted.
    BudgetDepth,

    /// SNBT syntax violation at the given one-based source position.
    Syntax { line: u32, column: u32 },

    /// A value could not be represented, such as a map with non-string keys
    /// passing through the serde bridge.
    Value,

    /// Any other errors. Users should not match on this variant and should
    /// instead use a wildcard `_`. Errors in this category may be moved to
    /// new variants.
    Other,
}

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// True for byte-quota and depth-quota failures.
    pub fn is_budget(&self) -> bool {
        matches!(self.kind, ErrorKind::BudgetBytes | ErrorKind::BudgetDepth)
    }

    pub(crate) fn invalid_tag(tag: u8) -> Error {
        Error {
            msg: format!("invalid nbt tag value: {}", tag),
            kind: ErrorKind::InvalidTag(tag),
        }
    }

    pub(crate) fn unexpected_eof() -> Error {
        Error {
            msg: "eof: unexpectedly ran out of input".to_owned(),
            kind: ErrorKind::UnexpectedEof,
        }
    }

    pub(crate) fn format(msg: impl Into<String>) -> Error {
        Error {
            msg: msg.into(),
            kind: ErrorKind::Format,
        }
    }

    pub(crate) fn budget_bytes(needed: u64) -> Error {
        Error {
            msg: format!("decode byte budget exhausted (needed {} more)", needed),
            kind: ErrorKind::BudgetBytes,
        }
    }

    pub(crate) fn budget_depth(max: usize) -> Error {
        Error {
            msg: format!("decode depth budget exhausted (max {})", max),
            kind: ErrorKind::BudgetDepth,
        }
    }

    pub(crate) fn nonunicode(data: &[u8]) -> Error {
        Error {
            msg: format!(
                "invalid nbt string: nonunicode: {}",
                String::from_utf8_lossy(data)
            ),
            kind: ErrorKind::Format,
        }
    }

    pub(crate) fn syntax(line: u32, column: u32, msg: impl Display) -> Error {
        Error {
            msg: format!("syntax error at line {}, column {}: {}", line, column, msg),
            kind: ErrorKind::Syntax { line, column },
        }
    }

    pub(crate) fn value(msg: impl Into<String>) -> Error {
        Error {
            msg: msg.into(),
            kind: ErrorKind::Value,
        }
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::unexpected_eof(),
            _ => Error {
                msg: format!("io error: {}", e),
                kind: ErrorKind::Other,
            },
        }
    }
}

impl serde::de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error {
            msg: msg.to_string(),
            kind: ErrorKind::Value,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error {
            msg: msg.to_string(),
            kind: ErrorKind::Value,
        }
    }
}
