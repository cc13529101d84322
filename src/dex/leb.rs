/// Decode a `uleb128` from the front of `encoded`.
///
/// Returns the value and the number of bytes consumed, or `None` if the
/// input ends mid-value or the encoding does not fit in 32 bits.
pub(crate) fn decode_uleb128(encoded: &[u8]) -> Option<(u32, usize)> {
    let mut value: u32 = 0;

    for (count, &byte) in encoded.iter().enumerate().take(5) {
        let low = (byte & 0x7F) as u32;

        // DEX uleb128 values are 32-bit, so the fifth byte carries 4 bits at most.
        if count == 4 && (byte & 0xF0) != 0 {
            return None;
        }
        value |= low << (7 * count);

        if (byte & 0x80) == 0 {
            return Some((value, count + 1));
        }
    }

    None
}

#[cfg(test)]
pub(crate) fn encode_uleb128(value: u32) -> Vec<u8> {
    let mut result = Vec::new();
    let mut remaining = value;

    loop {
        let mut byte = (remaining & 0x7F) as u8;
        remaining >>= 7;

        if remaining != 0 {
            byte |= 0x80;
        }

        result.push(byte);

        if remaining == 0 {
            break;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_uleb128() {
        let cases = vec![
            (vec![0x00], 0, 1),
            (vec![0x7F], 127, 1),
            (vec![0x80, 0x01], 128, 2),
            (vec![0xAC, 0x02], 300, 2),
            (vec![0x80, 0x7F], 16256, 2),
            (vec![0xE5, 0x8E, 0x26], 624485, 3),
            (vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F], u32::MAX, 5),
        ];

        for (encoded, expected, used) in cases {
            assert_eq!(decode_uleb128(&encoded), Some((expected, used)), "{:02x?}", encoded);
        }
    }

    #[test]
    fn stops_after_terminal_byte() {
        assert_eq!(decode_uleb128(&[0x05, 0x80, 0x80]), Some((5, 1)));
    }

    #[test]
    fn rejects_unterminated_and_oversized() {
        assert_eq!(decode_uleb128(&[]), None);
        assert_eq!(decode_uleb128(&[0x80, 0x80]), None);
        // continuation bit still set on the fifth byte
        assert_eq!(decode_uleb128(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]), None);
        // bits above 31
        assert_eq!(decode_uleb128(&[0xFF, 0xFF, 0xFF, 0xFF, 0x1F]), None);
    }

    #[test]
    fn test_encode_uleb128() {
        assert_eq!(encode_uleb128(0), vec![0x00]);
        assert_eq!(encode_uleb128(127), vec![0x7F]);
        assert_eq!(encode_uleb128(300), vec![0xAC, 0x02]);
        assert_eq!(encode_uleb128(u32::MAX), vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }
}
