//! Servers don't declare the encoding of their hostname, game mode and language,
//! so it is guessed from the reply bytes.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Guesses the charset a reply was written in.
pub trait CharsetDetector: Send + Sync {
    /// Returns `None` when nothing could be detected.
    fn detect(&self, data: &[u8]) -> Option<&'static Encoding>;
}

impl<F> CharsetDetector for F
where
    F: Fn(&[u8]) -> Option<&'static Encoding> + Send + Sync,
{
    fn detect(&self, data: &[u8]) -> Option<&'static Encoding> {
        self(data)
    }
}

/// Default detector, backed by `chardetng`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChardetDetector;

impl CharsetDetector for ChardetDetector {
    fn detect(&self, data: &[u8]) -> Option<&'static Encoding> {
        if data.is_empty() {
            return None;
        }
        let mut detector = EncodingDetector::new();
        detector.feed(data, true);
        Some(detector.guess(None, true))
    }
}

/// Decode `bytes` as `encoding`, falling back to UTF-8 when there is no
/// encoding or the bytes are malformed under it.
pub fn decode(bytes: &[u8], encoding: Option<&'static Encoding>) -> String {
    encoding
        .and_then(|enc| enc.decode_without_bom_handling_and_without_replacement(bytes))
        .map(|text| text.into_owned())
        .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_with_detected_charset() {
        // "При" in windows-1251
        let bytes: [u8; 3] = [0xcf, 0xf0, 0xe8];
        assert_eq!(decode(&bytes, Some(encoding_rs::WINDOWS_1251)), "При");
    }

    #[test]
    fn falls_back_to_utf8_without_charset() {
        assert_eq!(decode("Café".as_bytes(), None), "Café");
    }

    #[test]
    fn falls_back_to_utf8_when_malformed() {
        // 0xff is never valid in Shift_JIS lead position
        let bytes = b"ok\xff";
        assert_eq!(decode(bytes, Some(encoding_rs::SHIFT_JIS)), String::from_utf8_lossy(bytes));
    }

    #[test]
    fn chardet_detects_utf8() {
        let detected = ChardetDetector.detect("Grand Café Übersicht".as_bytes());
        assert_eq!(detected, Some(encoding_rs::UTF_8));
    }

    #[test]
    fn chardet_detects_nothing_in_empty_input() {
        assert_eq!(ChardetDetector.detect(&[]), None);
    }

    #[test]
    fn closures_are_detectors() {
        let fixed = |_: &[u8]| Some(encoding_rs::WINDOWS_1251);
        assert_eq!(fixed.detect(b"abc"), Some(encoding_rs::WINDOWS_1251));
    }
}
