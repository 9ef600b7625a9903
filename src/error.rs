use thiserror::Error;

/// Errors surfaced by the engine core. Per the design, most conditions are absorbed
/// inside the search itself; this taxonomy exists for what legitimately crosses a
/// boundary: configuration validation and programming-error fast-fails.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The board was not restored to its entry state after a make/unmake pair.
    /// This is a programming error in a collaborator, not a recoverable condition.
    #[error("board contract violation: {0}")]
    BoardContractViolation(String),
}

/// Sink for anomalies the search can recover from but should not pass silently.
/// Production code wires this to `log`; tests can inject a sink that records calls.
pub trait AnomalySink {
    fn record(&self, message: &str);
}

/// Default sink: forwards to the `log` crate at `error` level.
pub struct LoggingSink;

impl AnomalySink for LoggingSink {
    fn record(&self, message: &str) {
        log::error!("{}", message);
    }
}

#[cfg(test)]
pub(crate) struct RecordingSink {
    pub messages: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn new() -> Self {
        Self {
            messages: std::cell::RefCell::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl AnomalySink for RecordingSink {
    fn record(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
