//! Per-field text decoding with a memoized legacy fallback.
//!
//! Fields are decoded strictly as UTF-8 first. The first time strict decoding
//! fails, the decoder switches to windows-1252 and stays there for the rest of
//! the run: dump files are assumed to be uniformly encoded, and re-probing
//! every field would flip-flop between encodings on mixed-looking data.
//! Decoding never fails past the caller; the worst case is a best-effort
//! string whose validity the parser and filter judge later.
use encoding::all::WINDOWS_1252;
use encoding::{DecoderTrap, Encoding};
use log::info;

/// Stateful field decoder: strict UTF-8, falling back once to windows-1252.
#[derive(Debug, Default)]
pub struct FieldDecoder {
    fallback_engaged: bool,
}

impl FieldDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the legacy fallback was needed at any point this run.
    pub fn fallback_engaged(&self) -> bool {
        self.fallback_engaged
    }

    /// Decode one field's bytes to text, best effort.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        if !self.fallback_engaged {
            match std::str::from_utf8(bytes) {
                Ok(s) => return s.to_string(),
                Err(_) => {
                    self.fallback_engaged = true;
                    info!("input is not valid UTF-8, falling back to windows-1252 for this run");
                }
            }
        }
        WINDOWS_1252
            .decode(bytes, DecoderTrap::Replace)
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passes_through() {
        let mut d = FieldDecoder::new();
        assert_eq!(d.decode("héllo".as_bytes()), "héllo");
        assert!(!d.fallback_engaged());
    }

    #[test]
    fn invalid_utf8_engages_windows_1252() {
        let mut d = FieldDecoder::new();
        // 0xE9 is 'é' in windows-1252 but invalid as a lone UTF-8 byte
        assert_eq!(d.decode(b"caf\xE9"), "café");
        assert!(d.fallback_engaged());
    }

    #[test]
    fn fallback_is_memoized_for_the_run() {
        let mut d = FieldDecoder::new();
        d.decode(b"\xE9");
        // valid UTF-8 for 'é' now reads as two 1252 characters; the run
        // sticks with the fallback rather than re-probing per field
        assert_eq!(d.decode("é".as_bytes()), "Ã©");
    }

    #[test]
    fn plain_ascii_identical_under_both_encodings() {
        let mut strict = FieldDecoder::new();
        let mut fallen = FieldDecoder::new();
        fallen.decode(b"\xFF");
        assert_eq!(strict.decode(b"user123"), fallen.decode(b"user123"));
    }
}
