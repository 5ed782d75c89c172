//! Error-page heuristic for response bodies.
//!
//! CDNs and origins often answer a broken asset URL with `200 OK` and a
//! placeholder page. Looking at the first few bytes of the body is enough to
//! tell most of them apart from real media. The check is best-effort: a binary
//! file that happens to contain one of the markers near its start is a false
//! positive, and a placeholder without any marker slips through.

use std::sync::LazyLock;

use regex::bytes::Regex;

// HTML opening tags, a JSON `"code"` key, or the word "failed".
static ERROR_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)<!doctype|<html|<head|<body|"code"\s*:|failed"#)
        .expect("error marker pattern is valid")
});

/// Returns true if `buffer` looks like an error or placeholder page.
///
/// `buffer` is normally a short prefix of a response body; matching is
/// case-insensitive and works on arbitrary (non-UTF-8) bytes.
pub fn is_error_content(buffer: &[u8]) -> bool {
    ERROR_MARKERS.is_match(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_is_error_content() {
        assert!(is_error_content(b"<!DOCTYPE html><html><head>"));
        assert!(is_error_content(b"\n  <HTML lang=\"en\">"));
        assert!(is_error_content(b"<body>Not found</body>"));
    }

    #[test]
    fn test_json_envelope_is_error_content() {
        assert!(is_error_content(br#"{"code": 404, "message": "not found"}"#));
        assert!(is_error_content(br#"{"CODE":500}"#));
    }

    #[test]
    fn test_failed_token_is_error_content() {
        assert!(is_error_content(b"Request FAILED"));
        assert!(is_error_content(b"upload failed, try again"));
    }

    #[test]
    fn test_media_prefixes_pass() {
        // MP3 with ID3 tag
        assert!(!is_error_content(b"ID3\x04\x00\x00\x00\x00\x00#TSSE"));
        // PNG signature
        assert!(!is_error_content(b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR"));
        // JPEG
        assert!(!is_error_content(b"\xff\xd8\xff\xe0\x00\x10JFIF\x00"));
        // Plain lyrics file
        assert!(!is_error_content(b"[00:01.00]first line\n[00:03.20]second"));
    }

    #[test]
    fn test_empty_buffer_passes() {
        assert!(!is_error_content(b""));
    }

    #[test]
    fn test_invalid_utf8_does_not_panic() {
        assert!(!is_error_content(&[0xff, 0xfe, 0xfd, 0x00, 0x80]));
        assert!(is_error_content(&[0xff, 0xfe, b'<', b'h', b't', b'm', b'l']));
    }

    #[test]
    fn test_code_word_outside_json_key_passes() {
        // Only a quoted key counts as an envelope marker
        assert!(!is_error_content(b"source code listing"));
    }
}
