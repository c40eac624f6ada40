//! In-memory queue pair between a face and a local application.
//!
//! ```text
//!   Face ── InternalTransport ──► to_app ──► InternalClient (application)
//!   Face ◄─ poll_receive ──────── to_face ◄─ InternalClient::send
//! ```
//!
//! Either side closing shuts the link for both.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use shared_types::{Block, Packet};

use crate::domain::FaceUri;
use crate::error::TransportError;
use crate::ports::Transport;

#[derive(Debug, Default)]
pub(crate) struct Link {
    to_app: VecDeque<Block>,
    to_face: VecDeque<Block>,
    closed: bool,
}

pub(crate) type SharedLink = Arc<Mutex<Link>>;

pub(crate) fn is_open(link: &SharedLink) -> bool {
    !link.lock().closed
}

/// Face side of an internal link.
#[derive(Debug)]
pub struct InternalTransport {
    link: SharedLink,
}

impl InternalTransport {
    pub(crate) fn new(link: SharedLink) -> Self {
        Self { link }
    }
}

impl Transport for InternalTransport {
    fn send(&mut self, packet: &Packet) -> Result<(), TransportError> {
        let mut link = self.link.lock();
        if link.closed {
            return Err(TransportError::Closed);
        }
        link.to_app.push_back(packet.wire().clone());
        Ok(())
    }

    fn close(&mut self) {
        self.link.lock().closed = true;
    }

    fn poll_receive(&mut self) -> Option<Block> {
        self.link.lock().to_face.pop_front()
    }

    fn is_up(&self) -> bool {
        is_open(&self.link)
    }
}

/// Application side of an internal link.
#[derive(Debug, Clone)]
pub struct InternalClient {
    remote_uri: FaceUri,
    link: SharedLink,
}

impl InternalClient {
    pub(crate) fn new(remote_uri: FaceUri, link: SharedLink) -> Self {
        Self { remote_uri, link }
    }

    /// Remote URI of the face this client talks to.
    pub fn remote_uri(&self) -> &FaceUri {
        &self.remote_uri
    }

    /// Queue a packet for the face. It is dispatched on the face's next
    /// `process_incoming`.
    pub fn send(&self, packet: &Packet) -> Result<(), TransportError> {
        self.send_raw(packet.wire().clone())
    }

    /// Queue an arbitrary element, well-formed or not.
    pub fn send_raw(&self, element: Block) -> Result<(), TransportError> {
        let mut link = self.link.lock();
        if link.closed {
            return Err(TransportError::Closed);
        }
        link.to_face.push_back(element);
        Ok(())
    }

    /// Take the next element the face has sent.
    pub fn receive(&self) -> Option<Block> {
        self.link.lock().to_app.pop_front()
    }

    /// Disconnect. The face notices on its next `process_incoming`.
    pub fn close(&self) {
        self.link.lock().closed = true;
    }

    pub fn is_closed(&self) -> bool {
        !is_open(&self.link)
    }
}
