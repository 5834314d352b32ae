//! Quoted-printable transfer encoding (RFC 2045 §6.7) for property values.
//!
//! vCard 2.1 uses quoted-printable to carry line breaks and non-ASCII text
//! in property values. Encoding here produces the bare `=XY` stream; soft
//! line breaks are inserted by the folding writer, and stray ones surviving
//! in input are swallowed by the decoder.

use crate::core::Charset;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Encodes `text` as a quoted-printable value.
///
/// The text is first encoded to bytes with `charset`; every byte outside
/// printable ASCII (and `=` itself) becomes an uppercase `=XY` triplet, so
/// an embedded CRLF encodes as `=0D=0A` and the result is pure ASCII. Space
/// and tab stay literal.
#[must_use]
pub fn encode(text: &str, charset: Charset) -> String {
    let bytes = charset.encode(text);
    let mut out = String::with_capacity(bytes.len());

    for b in bytes {
        if b == b'\t' || (b != b'=' && (b' '..=b'~').contains(&b)) {
            out.push(char::from(b));
        } else {
            out.push('=');
            out.push(char::from(HEX_DIGITS[usize::from(b >> 4)]));
            out.push(char::from(HEX_DIGITS[usize::from(b & 0x0F)]));
        }
    }

    out
}

/// Decodes a quoted-printable value.
///
/// Malformed `=XY` escapes are passed through unmodified; the returned flag
/// reports whether any were seen. `=CRLF`/`=LF` soft breaks are swallowed.
/// The decoded byte stream is interpreted with `charset`, lossily.
#[must_use]
pub fn decode(text: &str, charset: Charset) -> (String, bool) {
    let src = text.as_bytes();
    let mut bytes: Vec<u8> = Vec::with_capacity(src.len());
    let mut malformed = false;
    let mut i = 0;

    while i < src.len() {
        let b = src[i];
        if b != b'=' {
            bytes.push(b);
            i += 1;
            continue;
        }

        let first = src.get(i + 1).copied();
        let second = src.get(i + 2).copied();
        match (first.and_then(hex_value), second.and_then(hex_value)) {
            (Some(hi), Some(lo)) => {
                bytes.push((hi << 4) | lo);
                i += 3;
            }
            _ if first == Some(b'\r') && second == Some(b'\n') => i += 3,
            _ if first == Some(b'\n') => i += 2,
            _ => {
                malformed = true;
                bytes.push(b'=');
                i += 1;
            }
        }
    }

    (charset.decode(&bytes), malformed)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_escapes_newlines_and_non_ascii() {
        assert_eq!(encode("a\r\nb", Charset::Utf8), "a=0D=0Ab");
        assert_eq!(encode("é", Charset::Utf8), "=C3=A9");
        assert_eq!(encode("é", Charset::Latin1), "=E9");
        assert_eq!(encode("1 = 1\t", Charset::Utf8), "1 =3D 1\t");
    }

    #[test]
    fn decode_multi_byte_sequences() {
        let (decoded, malformed) = decode("caf=C3=A9", Charset::Utf8);
        assert_eq!(decoded, "café");
        assert!(!malformed);

        let (decoded, _) = decode("caf=E9", Charset::Latin1);
        assert_eq!(decoded, "café");
    }

    #[test]
    fn decode_lower_case_hex() {
        let (decoded, malformed) = decode("=c3=a9", Charset::Utf8);
        assert_eq!(decoded, "é");
        assert!(!malformed);
    }

    #[test]
    fn decode_passes_malformed_escapes_through() {
        let (decoded, malformed) = decode("a=G1b=", Charset::Utf8);
        assert_eq!(decoded, "a=G1b=");
        assert!(malformed);
    }

    #[test]
    fn decode_swallows_stray_soft_breaks() {
        let (decoded, malformed) = decode("one=\r\ntwo", Charset::Utf8);
        assert_eq!(decoded, "onetwo");
        assert!(!malformed);
    }

    #[test]
    fn round_trip() {
        let original = "Grüße,\r\nviele 100% = fun";
        let (decoded, malformed) = decode(&encode(original, Charset::Utf8), Charset::Utf8);
        assert_eq!(decoded, original);
        assert!(!malformed);
    }
}
