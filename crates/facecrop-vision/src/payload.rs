//! Image payloads as sent by browsers: data URLs or bare base64.

use std::sync::LazyLock;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use regex::Regex;

use crate::error::{VisionError, VisionResult};

static DATA_URL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:image/\w+;base64,").expect("valid data URL regex"));

/// Accepts padded or unpadded input.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Remove a leading `data:image/<type>;base64,` prefix, if present.
pub fn strip_data_url_prefix(payload: &str) -> &str {
    match DATA_URL_PREFIX.find(payload) {
        Some(m) => &payload[m.end()..],
        None => payload,
    }
}

/// Decode a data URL or bare base64 string into image bytes.
///
/// Whitespace is ignored and URL-safe characters are accepted alongside the
/// standard alphabet.
pub fn decode_image_payload(payload: &str) -> VisionResult<Vec<u8>> {
    let encoded: String = strip_data_url_prefix(payload)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    if encoded.is_empty() {
        return Err(VisionError::invalid_payload("empty image data"));
    }

    LENIENT
        .decode(encoded.as_bytes())
        .map_err(|e| VisionError::invalid_payload(e.to_string()))
}

/// Encode image bytes as a `data:<mime>;base64,...` URL.
pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_data_url_prefix("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_url_prefix("data:image/jpeg;base64,QQ=="), "QQ==");
        assert_eq!(strip_data_url_prefix("AAAA"), "AAAA");
        // Only image MIME types carry the prefix
        assert_eq!(
            strip_data_url_prefix("data:text/plain;base64,AAAA"),
            "data:text/plain;base64,AAAA"
        );
        // svg+xml is not matched by the word-character subtype
        assert_eq!(
            strip_data_url_prefix("data:image/svg+xml;base64,AAAA"),
            "data:image/svg+xml;base64,AAAA"
        );
    }

    #[test]
    fn test_decode_data_url_and_bare() {
        let url = encode_data_url(b"hello face", "image/png");
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(decode_image_payload(&url).unwrap(), b"hello face");
        assert_eq!(decode_image_payload("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_is_lenient() {
        assert_eq!(decode_image_payload("aGVs\nbG8").unwrap(), b"hello");
        assert_eq!(decode_image_payload("_w").unwrap(), vec![0xff]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_image_payload("").is_err());
        assert!(decode_image_payload("data:image/png;base64,").is_err());
        assert!(decode_image_payload("not base64 at all!").is_err());
    }
}
