//! Scanning shorthands over a [`Scanner`](crate::Scanner).

#[macro_export]
/// Read space characters.
macro_rules! space {
    ($scanner:ident) => {{
        $scanner.read_while($crate::util::is_space);
    }};
}

#[macro_export]
/// Read decimal digits.
macro_rules! digits {
    ($scanner:ident) => {{
        $scanner.read_while($crate::util::is_digit)
    }};
}

#[macro_export]
/// Read until the given byte.
macro_rules! until {
    ($scanner:expr, $byte:expr) => {{
        $scanner.read_while(|b| b != $byte)
    }};
}

#[macro_export]
/// Read until a `\r` or `\n`.
macro_rules! until_newline {
    ($scanner:ident) => {{
        $scanner.read_while(|b| !$crate::util::is_newline(b))
    }};
}

#[macro_export]
/// Read newline characters.
macro_rules! newline {
    ($scanner:ident) => {{
        $scanner.read_while($crate::util::is_newline);
    }};
}

#[macro_export]
/// Read alphabetic characters.
macro_rules! alpha {
    ($scanner:ident) => {{
        $scanner.read_while($crate::util::is_alphabetic)
    }};
}

pub use alpha;
pub use digits;
pub use newline;
pub use space;
pub use until;
pub use until_newline;
