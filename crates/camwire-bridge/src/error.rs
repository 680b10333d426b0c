use camwire_frame::FrameError;
use camwire_transport::TransportError;

/// Errors surfaced by the publisher and subscriber drivers.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
}

impl BridgeError {
    /// Frame errors only cost the current frame; transport errors end the loop
    /// unless the transport says the call can be retried.
    pub fn is_recoverable(&self) -> bool {
        match self {
            BridgeError::Frame(_) => true,
            BridgeError::Transport(err) => err.is_retryable(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
