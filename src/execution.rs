//! One request, start to finish
//!
//! Encodes attachments, loads saved context, sends the request with the
//! loading animation running, then streams the answer into the sink and
//! saves the new continuation token. The sink is only opened once the server
//! has accepted the request, so a failed run never truncates an output file.
//! Shared by the binary and the integration tests.

use crate::cli::Config;
use crate::context::ContextStore;
use crate::display::Spinner;
use crate::errors::Result;
use crate::images::encode_images;
use crate::logging::Logger;
use crate::streaming::{decode_response, ContextHandler, DecodeSummary, GenerateClient};
use std::io::Write;

/// Run the request described by `config`, writing the answer to the sink
/// built by `open_sink`
///
/// `open_sink` runs after a 2xx response arrives and before the first byte
/// of the answer is decoded. `store` is `None` when context persistence is
/// off; otherwise saved tokens are sent along and the server's new token
/// replaces them. The sink is handed back with the summary.
pub async fn execute_request<F, W>(
    config: &Config,
    store: Option<&ContextStore>,
    open_sink: F,
    log: &Logger,
) -> Result<(DecodeSummary, W)>
where
    F: FnOnce() -> Result<W>,
    W: Write,
{
    let images = encode_images(&config.images, log)?;

    let context = match store {
        Some(store) => store.load(&config.model, log)?,
        None => None,
    };

    let payload = config.request_payload(images, context);
    let client = GenerateClient::with_url(&config.url)?;

    let spinner = Spinner::maybe_start(config.show_loading);
    let sent = {
        let _timer = log.timer("send request");
        client.send(&payload, log).await
    };
    spinner.stop().await;
    let response = sent?;
    let mut sink = open_sink()?;

    let _timer = log.timer("process response");
    let model = config.model.as_str();
    let mut persist = |tokens: &[i64]| -> Result<()> {
        match store {
            Some(store) => store.persist(model, tokens, log),
            None => Ok(()),
        }
    };
    let handler: Option<&mut ContextHandler<'_>> = match store {
        Some(_) => Some(&mut persist),
        None => None,
    };

    let summary = decode_response(response.bytes_stream(), &mut sink, handler).await?;
    log.debug(format_args!(
        "Decoded {} objects, wrote {} bytes (done: {})",
        summary.objects, summary.bytes_written, summary.done
    ));

    if !summary.done {
        log.warn("Stream ended without a final object");
    }

    Ok((summary, sink))
}
