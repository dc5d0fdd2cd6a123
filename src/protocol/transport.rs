//! Transport abstraction: the stove's serial line.
//!
//! Concrete implementations:
//! - ESP-IDF UART driver ([`crate::adapters::uart`], `espidf` feature)
//! - Scripted in-memory links in the integration tests
//!
//! The protocol engine is generic over `Transport`, so it never sees the
//! UART peripheral directly. Reads and writes are assumed reliable and
//! ordered; framing is the engine's job.

/// Byte-oriented full-duplex channel to the stove.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Check if data is available for reading.
    fn available(&self) -> bool;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buf)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        (**self).write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }

    fn available(&self) -> bool {
        (**self).available()
    }
}
