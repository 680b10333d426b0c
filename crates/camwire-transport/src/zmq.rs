//! ZeroMQ PUB/SUB transport.
//!
//! Each multipart message maps onto one ZeroMQ multipart message. The sockets
//! own their context, so a publisher and a subscriber can live in different
//! processes or in the same one.

use bytes::Bytes;
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::{MultipartReceiver, MultipartSender};

/// Linger period applied on close so pending frames do not block shutdown.
const CLOSE_LINGER_MS: i32 = 0;

/// A bound ZeroMQ PUB socket.
pub struct ZmqPublisher {
    _context: zmq::Context,
    socket: zmq::Socket,
    address: String,
}

impl ZmqPublisher {
    /// Create a PUB socket and bind it to `address` (e.g. `tcp://*:5556`).
    pub fn bind(address: &str) -> Result<Self> {
        let context = zmq::Context::new();
        let socket = context
            .socket(zmq::PUB)
            .map_err(|err| bind_error(address, err))?;
        socket
            .set_linger(CLOSE_LINGER_MS)
            .map_err(|err| bind_error(address, err))?;
        socket.bind(address).map_err(|err| bind_error(address, err))?;

        info!(address, "zmq publisher bound");
        Ok(Self {
            _context: context,
            socket,
            address: address.to_string(),
        })
    }

    /// The address this publisher was bound to.
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl MultipartSender for ZmqPublisher {
    fn send_parts(&mut self, parts: Vec<Bytes>) -> Result<()> {
        let count = parts.len();
        self.socket
            .send_multipart(parts.iter().map(|part| part.as_ref()), 0)
            .map_err(map_zmq_error)?;
        debug!(parts = count, "zmq multipart sent");
        Ok(())
    }
}

impl std::fmt::Debug for ZmqPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZmqPublisher")
            .field("address", &self.address)
            .finish()
    }
}

/// A connected ZeroMQ SUB socket.
pub struct ZmqSubscriber {
    _context: zmq::Context,
    socket: zmq::Socket,
    address: String,
}

impl ZmqSubscriber {
    /// Create a SUB socket connected to `address`, subscribed to every topic.
    pub fn connect(address: &str) -> Result<Self> {
        Self::connect_with_filter(address, b"")
    }

    /// Create a SUB socket connected to `address` with a prefix filter.
    pub fn connect_with_filter(address: &str, filter: &[u8]) -> Result<Self> {
        let context = zmq::Context::new();
        let socket = context
            .socket(zmq::SUB)
            .map_err(|err| connect_error(address, err))?;
        socket
            .set_linger(CLOSE_LINGER_MS)
            .map_err(|err| connect_error(address, err))?;
        socket
            .connect(address)
            .map_err(|err| connect_error(address, err))?;
        socket
            .set_subscribe(filter)
            .map_err(|err| connect_error(address, err))?;

        info!(address, "zmq subscriber connected");
        Ok(Self {
            _context: context,
            socket,
            address: address.to_string(),
        })
    }

    /// The address this subscriber is connected to.
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl MultipartReceiver for ZmqSubscriber {
    fn recv_parts(&mut self) -> Result<Vec<Bytes>> {
        let parts = self.socket.recv_multipart(0).map_err(map_zmq_error)?;
        debug!(parts = parts.len(), "zmq multipart received");
        Ok(parts.into_iter().map(Bytes::from).collect())
    }
}

impl std::fmt::Debug for ZmqSubscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZmqSubscriber")
            .field("address", &self.address)
            .finish()
    }
}

fn map_zmq_error(err: zmq::Error) -> TransportError {
    match err {
        zmq::Error::EINTR => TransportError::Interrupted,
        zmq::Error::ETERM | zmq::Error::ENOTSOCK => TransportError::Closed,
        other => TransportError::Zmq(other),
    }
}

fn bind_error(address: &str, err: zmq::Error) -> TransportError {
    TransportError::Bind {
        address: address.to_string(),
        reason: err.to_string(),
    }
}

fn connect_error(address: &str, err: zmq::Error) -> TransportError {
    TransportError::Connect {
        address: address.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn interrupted_and_terminated_map_to_typed_errors() {
        assert!(matches!(
            map_zmq_error(zmq::Error::EINTR),
            TransportError::Interrupted
        ));
        assert!(matches!(
            map_zmq_error(zmq::Error::ETERM),
            TransportError::Closed
        ));
        assert!(matches!(
            map_zmq_error(zmq::Error::EAGAIN),
            TransportError::Zmq(_)
        ));
    }

    #[test]
    fn bind_rejects_malformed_endpoint() {
        let err = ZmqPublisher::bind("not-an-endpoint").unwrap_err();
        assert!(matches!(err, TransportError::Bind { .. }));
    }

    #[test]
    fn pub_sub_roundtrip_over_loopback_tcp() {
        let mut publisher = ZmqPublisher::bind("tcp://127.0.0.1:*").unwrap();
        let endpoint = publisher
            .socket
            .get_last_endpoint()
            .unwrap()
            .expect("endpoint should be utf-8");
        let mut subscriber = ZmqSubscriber::connect(&endpoint).unwrap();

        // Slow-joiner: keep publishing until the subscription has propagated.
        let received = std::thread::scope(|scope| {
            let handle = scope.spawn(move || subscriber.recv_parts().unwrap());
            while !handle.is_finished() {
                publisher
                    .send_parts(vec![
                        Bytes::from_static(b"camera/image"),
                        Bytes::from_static(b"payload"),
                    ])
                    .unwrap();
                std::thread::sleep(Duration::from_millis(20));
            }
            handle.join().unwrap()
        });

        assert_eq!(received[0].as_ref(), b"camera/image");
        assert_eq!(received[1].as_ref(), b"payload");
    }
}
