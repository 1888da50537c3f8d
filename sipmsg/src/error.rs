use std::str::Utf8Error;

use thiserror::Error;

/// The result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while parsing or manipulating SIP messages.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum Error {
    /// The scanner ran out of input or hit an illegal byte for the
    /// current production.
    #[error("lexical error at line {line}, column {col}: {kind:?}")]
    Lex {
        /// The low-level scan failure.
        kind: sipmsg_util::ErrorKind,
        /// Line of the failure.
        line: usize,
        /// Column of the failure.
        col: usize,
    },

    /// A structural grammar rule failed.
    #[error("grammar error at line {line}, column {col}: {message}")]
    Grammar {
        /// What the grammar expected.
        message: String,
        /// Line of the failure.
        line: usize,
        /// Column of the failure.
        col: usize,
    },

    /// A specific header's grammar failed.
    #[error("malformed {name} header at line {line}, column {col}: {message}")]
    Header {
        /// The header name as received.
        name: String,
        /// What went wrong inside the header value.
        message: String,
        /// Line of the failure.
        line: usize,
        /// Column of the failure.
        col: usize,
    },

    /// A header that must be unique appeared more than once.
    #[error("duplicate {0} header")]
    DuplicateSingleton(String),

    /// `merge` was invoked across different concrete types.
    #[error("cannot merge {found} into {expected}")]
    TypeMismatch {
        /// Label of the receiving type.
        expected: &'static str,
        /// Label of the argument type.
        found: &'static str,
    },

    /// The structural recursion guard tripped.
    #[error("object tree deeper than {0} levels")]
    TooDeep(usize),

    /// The input contained bytes that are not valid UTF-8 where text
    /// was required.
    #[error("invalid UTF-8 in input")]
    Utf8,
}

impl From<sipmsg_util::Error> for Error {
    fn from(err: sipmsg_util::Error) -> Self {
        Error::Lex {
            kind: err.kind,
            line: err.line,
            col: err.col,
        }
    }
}

impl From<Utf8Error> for Error {
    fn from(_: Utf8Error) -> Self {
        Error::Utf8
    }
}
