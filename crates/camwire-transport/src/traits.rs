use bytes::Bytes;

use crate::error::Result;

/// Sending half of a multipart transport.
///
/// Ownership of the parts moves into the transport on every call.
pub trait MultipartSender {
    /// Send one multipart message. Parts are delivered in order, atomically.
    fn send_parts(&mut self, parts: Vec<Bytes>) -> Result<()>;
}

/// Receiving half of a multipart transport.
pub trait MultipartReceiver {
    /// Block until the next multipart message arrives.
    fn recv_parts(&mut self) -> Result<Vec<Bytes>>;
}

impl<T: MultipartSender + ?Sized> MultipartSender for &mut T {
    fn send_parts(&mut self, parts: Vec<Bytes>) -> Result<()> {
        (**self).send_parts(parts)
    }
}

impl<T: MultipartReceiver + ?Sized> MultipartReceiver for &mut T {
    fn recv_parts(&mut self) -> Result<Vec<Bytes>> {
        (**self).recv_parts()
    }
}

impl<T: MultipartSender + ?Sized> MultipartSender for Box<T> {
    fn send_parts(&mut self, parts: Vec<Bytes>) -> Result<()> {
        (**self).send_parts(parts)
    }
}

impl<T: MultipartReceiver + ?Sized> MultipartReceiver for Box<T> {
    fn recv_parts(&mut self) -> Result<Vec<Bytes>> {
        (**self).recv_parts()
    }
}
