use crate::shortcode::ShortCode;

/// Symbols a short code is drawn from, in index order.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number of symbols in every short code.
pub const SHORT_CODE_LENGTH: usize = 8;

/// Maps the leading bytes of `bytes` onto [`ALPHABET`] with `byte % 62`.
///
/// Exactly [`SHORT_CODE_LENGTH`] bytes are consumed, so the input is taken by
/// fixed-size array and the result is always a well-formed [`ShortCode`].
pub fn encode_bytes(bytes: &[u8; SHORT_CODE_LENGTH]) -> ShortCode {
    let code: String = bytes
        .iter()
        .map(|byte| ALPHABET[(*byte as usize) % ALPHABET.len()] as char)
        .collect();
    ShortCode::new_unchecked(code)
}

/// Returns `true` if `symbol` belongs to [`ALPHABET`].
pub fn is_symbol(symbol: char) -> bool {
    symbol.is_ascii_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        assert!(ALPHABET.iter().all(|b| seen.insert(*b)));
        assert!(ALPHABET.iter().all(|b| is_symbol(*b as char)));
    }

    #[test]
    fn encodes_by_modulo() {
        // 0 -> 'a', 61 -> '9', 62 wraps back to 'a', 255 % 62 == 7 -> 'h'
        let code = encode_bytes(&[0, 61, 62, 255, 25, 26, 51, 52]);
        assert_eq!(code.as_str(), "a9ahzAZ0");
    }

    #[test]
    fn every_byte_maps_into_alphabet() {
        for byte in 0..=u8::MAX {
            let code = encode_bytes(&[byte; SHORT_CODE_LENGTH]);
            assert_eq!(code.as_str().len(), SHORT_CODE_LENGTH);
            assert!(ShortCode::new(code.as_str()).is_ok());
        }
    }
}
