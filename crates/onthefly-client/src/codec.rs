use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;

use onthefly_core::AppError;
use onthefly_core::traits::Codec;

/// Payload codec: deflate-compressed content wrapped in unpadded
/// URL-safe base64, so encoded pages can travel in a query parameter.
///
/// Consumers treat this as a black box; the only contract is that
/// `decode(encode(x)) == x` and that rejected payloads come back as
/// [`AppError::DecodeError`].
#[derive(Debug, Clone, Default)]
pub struct UrlCodec;

impl UrlCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for UrlCodec {
    fn encode(&self, content: &str) -> Result<String, AppError> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(content.as_bytes())
            .and_then(|()| encoder.finish())
            .map(|compressed| URL_SAFE_NO_PAD.encode(compressed))
            .map_err(|e| AppError::Generic(format!("compression failed: {e}")))
    }

    fn decode(&self, payload: &str) -> Result<String, AppError> {
        let compressed = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| AppError::DecodeError(format!("invalid base64: {e}")))?;

        let mut decoder = DeflateDecoder::new(compressed.as_slice());
        let mut content = String::new();
        decoder
            .read_to_string(&mut content)
            .map_err(|e| AppError::DecodeError(format!("invalid deflate stream: {e}")))?;

        Ok(content)
    }
}
