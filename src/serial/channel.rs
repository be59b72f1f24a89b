//! Trait abstraction for byte channel operations to enable testing

use crate::error::Result;

/// One physical serial link as seen by the protocol state machines.
///
/// Decoders drain whatever is currently available and return; `read_byte`
/// is only called after `has_bytes` reports data, so no operation blocks.
pub trait ByteChannel: Send {
    /// Whether at least one unread byte is buffered on the link
    fn has_bytes(&self) -> bool;

    /// Read the next byte
    ///
    /// # Errors
    ///
    /// Returns `RoverCoreError::Transport` if the underlying link reports
    /// a read or framing fault.
    fn read_byte(&mut self) -> Result<u8>;

    /// Write all bytes to the link
    ///
    /// # Errors
    ///
    /// Returns `RoverCoreError::Transport` if the write fails.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;
}
