//! Where answer text goes
//!
//! The console (unless silent) and optionally a file, written in lockstep.
//! Every write is flushed by the decoder so text shows up as it streams in.

use crate::errors::{NinoError, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Tee writer over console and output file
pub struct OutputSink {
    console: Option<Box<dyn Write + Send>>,
    file: Option<File>,
    path: Option<PathBuf>,
}

impl OutputSink {
    /// Sink writing to stdout unless `silent`, and to `output` when given
    pub fn open(silent: bool, output: Option<&Path>) -> Result<Self> {
        let console: Option<Box<dyn Write + Send>> = if silent {
            None
        } else {
            Some(Box::new(io::stdout()))
        };
        Self::with_console(console, output)
    }

    /// Sink with an explicit console writer
    pub fn with_console(console: Option<Box<dyn Write + Send>>, output: Option<&Path>) -> Result<Self> {
        let file = output
            .map(|path| {
                File::create(path).map_err(|e| {
                    NinoError::Config(format!(
                        "error creating output file '{}': {}",
                        path.display(),
                        e
                    ))
                })
            })
            .transpose()?;

        Ok(Self {
            console,
            file,
            path: output.map(Path::to_path_buf),
        })
    }

    /// File the answer is being saved to
    pub fn saved_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether text reaches the terminal
    pub fn has_console(&self) -> bool {
        self.console.is_some()
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(console) = self.console.as_mut() {
            console.write_all(buf)?;
        }
        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(console) = self.console.as_mut() {
            console.flush()?;
        }
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}
