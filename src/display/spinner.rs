//! "Thinking" animation shown while waiting for the server
//!
//! Runs as its own tokio task drawing an indicatif spinner line on stderr.
//! The task owns nothing the decoder uses; [`Spinner::stop`] signals it and
//! waits for it to finish so the line is cleared before any answer text is
//! printed.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Default animation label
pub const DEFAULT_LABEL: &str = "Thinking";

/// Delay between animation frames
const FRAME_INTERVAL: Duration = Duration::from_millis(150);

/// Number of shades in the wave, darkest first
const SHADES: usize = 3;

/// Handle to a running (or disabled) spinner
pub struct Spinner {
    stop: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    /// Start animating `label` on stderr
    pub fn start(label: &str) -> Self {
        let (stop, stopped) = oneshot::channel();
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

        let label = label.to_string();
        let handle = tokio::spawn(animate(pb, label, stopped));

        Self {
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    /// A spinner that draws nothing
    pub fn disabled() -> Self {
        Self {
            stop: None,
            handle: None,
        }
    }

    /// Start animating unless `enabled` is false
    pub fn maybe_start(enabled: bool) -> Self {
        if enabled {
            Self::start(DEFAULT_LABEL)
        } else {
            Self::disabled()
        }
    }

    /// Whether an animation task is running
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the animation and wait for the line to be cleared
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

async fn animate(pb: ProgressBar, label: String, mut stopped: oneshot::Receiver<()>) {
    let frames = label.chars().count() + SHADES;
    let mut ticker = tokio::time::interval(FRAME_INTERVAL);
    let mut frame = 0;

    loop {
        tokio::select! {
            _ = &mut stopped => break,
            _ = ticker.tick() => {
                pb.set_message(wave_frame(&label, frame));
                frame = (frame + 1) % frames;
            }
        }
    }

    pb.finish_and_clear();
}

/// Render one frame: a bright band sweeping left to right over `label`
fn wave_frame(label: &str, wave_start: usize) -> String {
    label
        .chars()
        .enumerate()
        .map(|(i, ch)| {
            let shade = wave_start
                .checked_sub(i)
                .filter(|offset| *offset < SHADES)
                .map_or(0, |offset| SHADES - 1 - offset);
            shade_char(ch, shade)
        })
        .collect()
}

fn shade_char(ch: char, shade: usize) -> String {
    let text = ch.to_string();
    match shade {
        0 => text.bright_black().bold().to_string(),
        1 => text.white().bold().to_string(),
        _ => text.bright_white().to_string(),
    }
}
