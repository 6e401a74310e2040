use std::io::Read;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use flate2::read::ZlibDecoder;
use thiserror::Error;

use crate::config::ImportConfig;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("share code is too large ({len} characters, limit {limit})")]
    TooLarge { len: usize, limit: usize },
    #[error("share code is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("share code payload failed to decompress: {0}")]
    DecompressionFailed(#[source] std::io::Error),
    #[error("decompressed document exceeds the {limit} byte limit")]
    DecompressedTooLarge { limit: usize },
    #[error("decompressed document is not valid UTF-8")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),
}

/// Turns share-code text into the decompressed build document.
///
/// Share codes are zlib-compressed documents encoded with a URL-safe
/// base64 alphabet (`-` and `_` in place of `+` and `/`, padding
/// stripped). Both the encoded and the decompressed size are bounded so
/// that adversarial pastes can neither stall nor balloon the process.
#[derive(Debug, Clone)]
pub struct CodeCodec {
    max_encoded_len: usize,
    max_decompressed_len: usize,
}

impl CodeCodec {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            max_encoded_len: config.max_encoded_len,
            max_decompressed_len: config.max_decompressed_len,
        }
    }

    /// Decodes a share code into the document string it carries.
    ///
    /// The size check runs before any base64 or zlib work, so oversized
    /// input costs O(len) and nothing more. No partial document is ever
    /// returned on error.
    pub fn decode(&self, code: &str) -> Result<String, CodecError> {
        let trimmed = code.trim();
        if trimmed.len() > self.max_encoded_len {
            return Err(CodecError::TooLarge {
                len: trimmed.len(),
                limit: self.max_encoded_len,
            });
        }

        let compressed = BASE64.decode(to_standard_alphabet(trimmed))?;
        let document = self.decompress(&compressed)?;
        Ok(String::from_utf8(document)?)
    }

    /// Inflates at most `max_decompressed_len` bytes. A stream that still
    /// has output left past the bound is a decompression bomb and is
    /// rejected rather than truncated.
    fn decompress(&self, compressed: &[u8]) -> Result<Vec<u8>, CodecError> {
        let limit = self.max_decompressed_len;
        let mut decoder = ZlibDecoder::new(compressed);
        let mut document = Vec::new();
        decoder
            .by_ref()
            .take(limit as u64 + 1)
            .read_to_end(&mut document)
            .map_err(CodecError::DecompressionFailed)?;
        if document.len() > limit {
            return Err(CodecError::DecompressedTooLarge { limit });
        }
        Ok(document)
    }
}

/// Maps the URL-safe alphabet back to standard base64 and restores the
/// padding the encoder strips.
fn to_standard_alphabet(code: &str) -> String {
    let mut standard: String = code
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while standard.len() % 4 != 0 {
        standard.push('=');
    }
    standard
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use pretty_assertions::assert_eq;

    use super::*;

    fn encode(document: &[u8]) -> String {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(document).unwrap();
        let compressed = encoder.finish().unwrap();
        BASE64
            .encode(compressed)
            .replace('+', "-")
            .replace('/', "_")
            .trim_end_matches('=')
            .to_string()
    }

    fn codec() -> CodeCodec {
        CodeCodec::new(&ImportConfig::default())
    }

    #[test]
    fn decodes_a_round_tripped_document() {
        let code = encode(b"<PathOfBuilding/>");
        assert_eq!(codec().decode(&code).unwrap(), "<PathOfBuilding/>");
    }

    #[test]
    fn trims_surrounding_whitespace_before_decoding() {
        let code = format!("  {}\n", encode(b"<PathOfBuilding/>"));
        assert_eq!(codec().decode(&code).unwrap(), "<PathOfBuilding/>");
    }

    #[test]
    fn rejects_oversized_input_before_decoding() {
        // Valid base64 characters, but longer than the configured bound.
        // If this were decoded it would fail with InvalidBase64 or
        // DecompressionFailed instead, so TooLarge proves the check
        // happened first.
        let config = ImportConfig {
            max_encoded_len: 64,
            ..ImportConfig::default()
        };
        let oversized = "A".repeat(65);
        let result = CodeCodec::new(&config).decode(&oversized);
        assert!(matches!(result, Err(CodecError::TooLarge { len: 65, limit: 64 })));
    }

    #[test]
    fn garbage_reaches_the_decoder_when_under_the_bound() {
        // Control case for the test above: the same shape of input under
        // the bound gets past the size check and fails later.
        let config = ImportConfig {
            max_encoded_len: 64,
            ..ImportConfig::default()
        };
        let result = CodeCodec::new(&config).decode(&"A".repeat(64));
        assert!(matches!(result, Err(CodecError::DecompressionFailed(_))));
    }

    #[test]
    fn rejects_invalid_base64() {
        let result = codec().decode("not base64 at all!!!");
        assert!(matches!(result, Err(CodecError::InvalidBase64(_))));
    }

    #[test]
    fn rejects_a_decompression_bomb() {
        // A few KB of compressed zeros inflating past a 4 KiB bound.
        let config = ImportConfig {
            max_decompressed_len: 4096,
            ..ImportConfig::default()
        };
        let code = encode(&vec![0u8; 1_000_000]);
        let result = CodeCodec::new(&config).decode(&code);
        assert!(matches!(
            result,
            Err(CodecError::DecompressedTooLarge { limit: 4096 })
        ));
    }

    #[test]
    fn accepts_a_document_exactly_at_the_bound() {
        let config = ImportConfig {
            max_decompressed_len: 4096,
            ..ImportConfig::default()
        };
        let document = vec![b'x'; 4096];
        let code = encode(&document);
        let decoded = CodeCodec::new(&config).decode(&code).unwrap();
        assert_eq!(decoded.len(), 4096);
    }

    #[test]
    fn rejects_invalid_utf8_payloads() {
        let code = encode(&[0xff, 0xfe, 0x00, 0x80]);
        let result = codec().decode(&code);
        assert!(matches!(result, Err(CodecError::InvalidEncoding(_))));
    }

    #[test]
    fn restores_padding_of_any_length() {
        // Documents of varying length exercise the 0/1/2 padding cases.
        for len in 1..=8 {
            let document = "x".repeat(len);
            let code = encode(document.as_bytes());
            assert!(!code.ends_with('='));
            assert_eq!(codec().decode(&code).unwrap(), document);
        }
    }
}
