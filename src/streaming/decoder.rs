//! Response stream decoder
//!
//! Consumes the body of a generate call as a sequence of `ResponsePayload`
//! objects and writes each text fragment to the sink as soon as it is decoded.
//! Decoding ends at the first object with `done: true`; whatever follows it in
//! the body is never read. Output already written stays written if a later
//! object turns out to be malformed.

use crate::errors::{NinoError, Result};
use crate::streaming::parser::JsonParser;
use crate::types::ResponsePayload;
use futures_util::{Stream, StreamExt};
use std::io::Write;

/// Callback receiving the continuation token of the final object
pub type ContextHandler<'a> = dyn FnMut(&[i64]) -> Result<()> + 'a;

/// What a decode run saw
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Objects decoded, including ones with empty text
    pub objects: usize,
    /// Bytes of text written to the sink
    pub bytes_written: usize,
    /// Whether a `done: true` object was reached
    pub done: bool,
    /// Length of the continuation token handed to the callback
    pub context_len: Option<usize>,
}

/// Decode a response body into `sink`
///
/// `stream` yields raw body chunks in arrival order; objects may be split
/// across chunks arbitrarily. An empty stream is a success with no output.
pub async fn decode_response<S, B, E, W>(
    stream: S,
    sink: &mut W,
    mut on_context: Option<&mut ContextHandler<'_>>,
) -> Result<DecodeSummary>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<NinoError>,
    W: Write + ?Sized,
{
    let mut parser = JsonParser::new();
    let mut summary = DecodeSummary::default();

    futures_util::pin_mut!(stream);

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(Into::into)?;
        parser.add_bytes(chunk.as_ref());

        while let Some(json) = parser.next_json()? {
            let payload: ResponsePayload =
                serde_json::from_str(&json).map_err(|e| NinoError::Decode(e.to_string()))?;
            summary.objects += 1;

            if !payload.response.is_empty() {
                sink.write_all(payload.response.as_bytes())?;
                sink.flush()?;
                summary.bytes_written += payload.response.len();
            }

            if payload.done {
                summary.done = true;
                if let (Some(handler), Some(tokens)) = (on_context.take(), payload.continuation()) {
                    handler(tokens).map_err(|e| NinoError::ContextHandler(Box::new(e)))?;
                    summary.context_len = Some(tokens.len());
                }
                return Ok(summary);
            }
        }
    }

    parser.finish()?;
    Ok(summary)
}
