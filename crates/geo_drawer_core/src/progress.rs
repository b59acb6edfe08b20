//! Human-readable progress lines emitted by the bootstrapper.

/// Receiver of confirmation messages.
pub trait ProgressSink {
    fn report(&mut self, message: &str);
}

/// Prints each message as one line on standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutProgress;

impl ProgressSink for StdoutProgress {
    fn report(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Collects messages in memory.
impl ProgressSink for Vec<String> {
    fn report(&mut self, message: &str) {
        self.push(message.to_string());
    }
}
