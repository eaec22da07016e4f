use std::fmt::Display;

use bytes::Bytes;
use futures::{Stream, StreamExt, pin_mut};

use onthefly_core::AppError;

/// Below this many accumulated characters, a partial body is not
/// trustworthy and a stream failure propagates as an error.
const SALVAGE_THRESHOLD: usize = 1000;

/// Consume a response body incrementally, decoding bytes to text.
///
/// A failure mid-stream does not necessarily fail the read: many
/// pages are usable for metadata extraction even when the tail of the
/// stream (trailing scripts, say) is truncated. If the buffer already
/// holds at least [`SALVAGE_THRESHOLD`] characters when the stream
/// breaks, the partial content is returned as a success.
///
/// The stream is consumed by value and dropped on every exit path, so
/// the underlying reader is always released.
pub async fn read_body<S, E>(stream: S) -> Result<String, AppError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Display,
{
    pin_mut!(stream);

    let mut accumulated = String::new();
    while let Some(next) = stream.next().await {
        match next {
            Ok(chunk) => accumulated.push_str(&String::from_utf8_lossy(&chunk)),
            Err(err) if accumulated.len() >= SALVAGE_THRESHOLD => {
                tracing::warn!(
                    chars = accumulated.len(),
                    error = %err,
                    "Body stream failed mid-read, salvaging partial content"
                );
                return Ok(accumulated);
            }
            Err(err) => {
                return Err(AppError::StreamError(format!(
                    "body read failed after {} chars: {err}",
                    accumulated.len()
                )));
            }
        }
    }

    Ok(accumulated)
}
