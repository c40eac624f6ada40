//! Transport that silently discards everything.

use shared_types::Packet;

use crate::error::TransportError;
use crate::ports::Transport;

/// Sink transport backing the reserved null face.
#[derive(Debug, Default)]
pub struct NullTransport {
    closed: bool,
}

impl NullTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for NullTransport {
    fn send(&mut self, _packet: &Packet) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn is_up(&self) -> bool {
        !self.closed
    }
}
