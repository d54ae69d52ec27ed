//! Terminal presentation: answer output and the loading animation

pub mod output;
pub mod spinner;

pub use output::OutputSink;
pub use spinner::Spinner;
