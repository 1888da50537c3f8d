//! Character classification helpers shared by the scanner and parser.

/// Returns `true` for a space or horizontal tab.
#[inline(always)]
pub const fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t')
}

/// Returns `true` for `\r` or `\n`.
#[inline(always)]
pub const fn is_newline(c: u8) -> bool {
    matches!(c, b'\r' | b'\n')
}

/// Returns `true` for an ASCII decimal digit.
#[inline(always)]
pub const fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

/// Returns `true` for an ASCII alphabetic character.
#[inline(always)]
pub const fn is_alphabetic(c: u8) -> bool {
    c.is_ascii_alphabetic()
}

/// Returns `true` for an ASCII alphanumeric character.
#[inline(always)]
pub const fn is_alphanumeric(c: u8) -> bool {
    c.is_ascii_alphanumeric()
}

/// Returns `true` for an ASCII hexadecimal digit.
#[inline(always)]
pub const fn is_hex_digit(c: u8) -> bool {
    c.is_ascii_hexdigit()
}

/// Returns `true` if `port` is usable as a SIP port number.
#[inline(always)]
pub const fn is_valid_port(port: u16) -> bool {
    port > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes() {
        assert!(is_space(b' ') && is_space(b'\t') && !is_space(b'x'));
        assert!(is_newline(b'\r') && is_newline(b'\n') && !is_newline(b' '));
        assert!(is_hex_digit(b'f') && is_hex_digit(b'A') && is_hex_digit(b'0'));
        assert!(!is_hex_digit(b'g'));
        assert!(is_valid_port(5060) && !is_valid_port(0));
    }
}
