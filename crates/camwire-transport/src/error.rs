/// Errors that can occur in multipart transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The other end of the transport has gone away.
    #[error("transport closed")]
    Closed,

    /// A blocking call was interrupted by a signal before a message arrived.
    #[error("transport call interrupted")]
    Interrupted,

    /// An I/O error occurred on the transport.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to bind the publishing endpoint.
    #[error("failed to bind to {address}: {reason}")]
    Bind { address: String, reason: String },

    /// Failed to connect the subscribing endpoint.
    #[error("failed to connect to {address}: {reason}")]
    Connect { address: String, reason: String },

    /// ZeroMQ reported an error on an established socket.
    #[cfg(feature = "zmq")]
    #[error("zmq error: {0}")]
    Zmq(#[from] ::zmq::Error),
}

impl TransportError {
    /// True when the failed call can simply be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Interrupted)
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
