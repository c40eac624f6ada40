//! # Internal Faces
//!
//! Local applications living in the same process reach the forwarder
//! through `internal://` faces. The face side holds an `InternalTransport`;
//! the application side holds an `InternalClient` looked up on the channel
//! by the face's remote URI.

mod channel;
mod factory;
mod transport;

#[cfg(test)]
mod tests;

pub use channel::{InternalChannel, INTERNAL_SCHEME};
pub use factory::{ChannelSlot, InternalFactory, InternalOptions};
pub use transport::{InternalClient, InternalTransport};
