//! Hex literal parsing

/// Parse 1 to 4 hex digits, most significant first.
///
/// Returns `None` if the string is empty, too long for 16 bits, or contains a
/// non-hex character.
pub fn parse_hex(s: &str) -> Option<u16> {
    if s.is_empty() || s.len() > 4 {
        return None;
    }
    s.bytes().try_fold(0u16, |acc, c| {
        let digit = (c as char).to_digit(16)?;
        Some(acc * 16 + digit as u16)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_digits() {
        assert_eq!(parse_hex("FF"), Some(0xFF));
        assert_eq!(parse_hex("ff"), Some(0xFF));
        assert_eq!(parse_hex("0a"), Some(0x0A));
        assert_eq!(parse_hex("1234"), Some(0x1234));
        assert_eq!(parse_hex("FFFF"), Some(0xFFFF));
    }

    #[test]
    fn test_invalid_hex() {
        assert_eq!(parse_hex(""), None);
        assert_eq!(parse_hex("G5"), None);
        assert_eq!(parse_hex("10000"), None);
    }

    #[test]
    fn test_byte_round_trip() {
        for value in 0..=0xFFu16 {
            let lower = format!("{value:02x}");
            let upper = format!("{value:02X}");
            assert_eq!(parse_hex(&lower), Some(value));
            assert_eq!(parse_hex(&upper), Some(value));
        }
    }
}
