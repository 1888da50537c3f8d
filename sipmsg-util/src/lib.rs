#![deny(missing_docs)]
//! Shared utilities for the `sipmsg` workspace: the byte [`Scanner`]
//! the parser is built on, the [`ArcStr`] shared string type and the
//! character classification helpers.

mod arcstr;
pub mod macros;
pub mod scanner;
pub mod util;

pub use arcstr::ArcStr;
pub use scanner::{Error, ErrorKind, Position, Scanner};
