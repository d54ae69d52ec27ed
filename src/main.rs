//! nino - Main CLI Entry Point

use anyhow::Result;
use nino::{
    bootstrap::{Bootstrap, EXIT_CODE_SETUP_NEEDED},
    cli::{Args, Config},
    context::ContextStore,
    display::OutputSink,
    execute_request, Logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_env();
    let config = Config::from_args(args)?;
    let log = Logger::new(config.verbose);

    log.debug(format_args!(
        "model: {}, url: {}, stream: {}, context: {}, images: {}",
        config.model,
        config.url,
        config.stream,
        config.use_context,
        config.images.len()
    ));

    let bootstrap = Bootstrap::new(&config.url, &config.model);
    if !bootstrap.check_server_running().await {
        bootstrap.show_server_hint();
        std::process::exit(EXIT_CODE_SETUP_NEEDED);
    }

    let store = if config.use_context {
        Some(ContextStore::from_env(|key| std::env::var(key).ok())?)
    } else {
        None
    };

    let open_sink = || OutputSink::open(config.silent, config.output.as_deref());
    let (_, sink) = execute_request(&config, store.as_ref(), open_sink, &log).await?;

    if !config.silent {
        match sink.saved_path() {
            Some(path) => println!("\nOutput saved to {}", path.display()),
            // Keep the shell prompt off the last line of the answer
            None => println!(),
        }
    }

    Ok(())
}
