//! Plain-text decoding over a fixed, ordered list of encodings.

use encoding_rs::{UTF_16BE, UTF_16LE, WINDOWS_1251};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextEncoding {
    Utf8,
    Utf8Sig,
    Utf16,
    Windows1251,
    Latin1,
}

const ENCODINGS: [TextEncoding; 5] = [
    TextEncoding::Utf8,
    TextEncoding::Utf8Sig,
    TextEncoding::Utf16,
    TextEncoding::Windows1251,
    TextEncoding::Latin1,
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode with the first encoding that accepts the bytes strictly.
/// Latin-1 accepts everything, so this always returns.
pub fn decode(bytes: &[u8]) -> String {
    for encoding in ENCODINGS {
        if let Some(text) = try_decode(bytes, encoding) {
            debug!(?encoding, bytes = bytes.len(), "decoded plain text");
            return text;
        }
    }
    String::new()
}

fn try_decode(bytes: &[u8], encoding: TextEncoding) -> Option<String> {
    match encoding {
        TextEncoding::Utf8 => {
            if bytes.starts_with(UTF8_BOM) {
                return None;
            }
            std::str::from_utf8(bytes).ok().map(str::to_owned)
        }
        TextEncoding::Utf8Sig => {
            let rest = bytes.strip_prefix(UTF8_BOM)?;
            std::str::from_utf8(rest).ok().map(str::to_owned)
        }
        TextEncoding::Utf16 => {
            // Only attempted with a byte-order mark; without one any even-length
            // 8-bit file would "decode" into noise.
            let (codec, body) = if let Some(rest) = bytes.strip_prefix(b"\xFF\xFE") {
                (UTF_16LE, rest)
            } else if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
                (UTF_16BE, rest)
            } else {
                return None;
            };
            codec
                .decode_without_bom_handling_and_without_replacement(body)
                .map(|s| s.into_owned())
        }
        TextEncoding::Windows1251 => WINDOWS_1251
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|s| s.into_owned()),
        TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_is_preferred() {
        assert_eq!(decode("привет, world".as_bytes()), "привет, world");
    }

    #[test]
    fn utf8_signature_is_stripped() {
        assert_eq!(decode(b"\xEF\xBB\xBFhello"), "hello");
    }

    #[test]
    fn utf16_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "hi ж".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode(&bytes), "hi ж");
    }

    #[test]
    fn cp1251_cyrillic() {
        let (encoded, _, _) = WINDOWS_1251.encode("Отчёт за квартал");
        assert_eq!(decode(&encoded), "Отчёт за квартал");
    }

    #[test]
    fn latin1_is_the_last_resort() {
        // 0x98 is unmapped in windows-1251.
        assert_eq!(decode(b"a\x98b"), "a\u{98}b");
    }

    #[test]
    fn empty_input() {
        assert_eq!(decode(b""), "");
    }
}
