//! Encoding recovery for export files that are not clean UTF-8.
//!
//! Telegram Desktop writes UTF-8, but exports passed through other tools or
//! re-saved by editors occasionally arrive in legacy encodings. Decoding
//! never aborts: strict UTF-8 is tried first, then statistical detection,
//! then lossy UTF-8 replacement as the last resort.

use chardetng::EncodingDetector;
use tracing::{debug, warn};

/// Decodes raw export bytes to text, always producing *some* string.
pub(crate) fn decode_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_owned(),
        Err(_) => {
            warn!("input is not valid UTF-8, running encoding detection");
            decode_with_detection(bytes)
        }
    }
}

fn decode_with_detection(bytes: &[u8]) -> String {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);

    // chardetng exposes no confidence score, so any detection pass is
    // reported at warn level rather than only low-confidence ones.
    let encoding = detector.guess(None, true);
    warn!(encoding = encoding.name(), "decoding with detected encoding");

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(
            encoding = used.name(),
            "detected encoding still produced errors, falling back to lossy UTF-8"
        );
        return String::from_utf8_lossy(bytes).into_owned();
    }

    debug!(encoding = used.name(), "decoded input with detected encoding");
    text.into_owned()
}
