//! # Face
//!
//! A face is one bidirectional endpoint: it owns the identity, locators,
//! counters and event emitters, and hands packets to its `Transport`.
//!
//! ```text
//!  forwarding core                      transport / reactor
//!        │ send_interest / send_data           │ decode_and_dispatch_input
//!        ▼                                     ▼
//!  ┌──────────────────────── Face ───────────────────────────┐
//!  │ id, uris, counters                                      │
//!  │ on_send_* ◄── after transport accepts                   │
//!  │ on_receive_* ◄── after decode succeeds                  │
//!  │ on_fail ◄── close() or fail(reason), exactly once       │
//!  └─────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::sync::Arc;

use shared_types::{Block, Data, Interest, Packet, MAX_PACKET_SIZE};
use tracing::{debug, info, warn};

use crate::adapters::TlvPacketDecoder;
use crate::domain::{EventEmitter, FaceCounters, FaceId, FaceUri};
use crate::error::{DecodeError, FaceError};
use crate::ports::{PacketDecoder, Transport};
use crate::service::face_table::IdAssigner;

/// Reason reported on the failure event by `close()`.
pub const CLOSE_REASON: &str = "close requested";

/// Polymorphic network endpoint.
pub struct Face {
    id: FaceId,
    remote_uri: FaceUri,
    local_uri: FaceUri,
    is_local: bool,
    is_on_demand: bool,
    local_fields_enabled: bool,
    description: String,
    counters: FaceCounters,
    failed: bool,
    transport: Box<dyn Transport>,
    decoder: Arc<dyn PacketDecoder>,

    on_receive_interest: EventEmitter<Interest>,
    on_receive_data: EventEmitter<Data>,
    on_send_interest: EventEmitter<Interest>,
    on_send_data: EventEmitter<Data>,
    on_fail: EventEmitter<String>,
}

impl Face {
    /// Create an unregistered, non-local face.
    pub fn new(remote_uri: FaceUri, local_uri: FaceUri, transport: Box<dyn Transport>) -> Self {
        Self {
            id: FaceId::INVALID,
            remote_uri,
            local_uri,
            is_local: false,
            is_on_demand: false,
            local_fields_enabled: false,
            description: String::new(),
            counters: FaceCounters::default(),
            failed: false,
            transport,
            decoder: Arc::new(TlvPacketDecoder),
            on_receive_interest: EventEmitter::new(),
            on_receive_data: EventEmitter::new(),
            on_send_interest: EventEmitter::new(),
            on_send_data: EventEmitter::new(),
            on_fail: EventEmitter::new(),
        }
    }

    /// Mark the face as connected to a local application.
    #[must_use]
    pub fn with_local(mut self, is_local: bool) -> Self {
        self.is_local = is_local;
        self
    }

    /// Enable link-local header fields. Only honored on local faces.
    #[must_use]
    pub fn with_local_fields(mut self, enabled: bool) -> Self {
        self.local_fields_enabled = enabled && self.is_local;
        self
    }

    /// Replace the wire decoder.
    #[must_use]
    pub fn with_decoder(mut self, decoder: Arc<dyn PacketDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    // -------------------------------------------------------------------------
    // Attributes
    // -------------------------------------------------------------------------

    pub fn id(&self) -> FaceId {
        self.id
    }

    pub fn remote_uri(&self) -> &FaceUri {
        &self.remote_uri
    }

    pub fn local_uri(&self) -> &FaceUri {
        &self.local_uri
    }

    pub fn is_local(&self) -> bool {
        self.is_local
    }

    pub fn is_on_demand(&self) -> bool {
        self.is_on_demand
    }

    pub fn local_fields_enabled(&self) -> bool {
        self.local_fields_enabled
    }

    /// Whether packets sent here may reach more than one peer.
    pub fn is_multi_access(&self) -> bool {
        self.transport.is_multi_access()
    }

    /// Whether the underlying link is up.
    pub fn is_up(&self) -> bool {
        !self.failed && self.transport.is_up()
    }

    /// Whether the failure event has fired.
    pub fn is_closed(&self) -> bool {
        self.failed
    }

    pub fn counters(&self) -> &FaceCounters {
        &self.counters
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Operator annotation; no behavioral effect.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Flag the face as created by inbound traffic.
    ///
    /// Only the creating factory may call this, before registration.
    pub fn set_on_demand(&mut self, is_on_demand: bool) -> Result<(), FaceError> {
        if self.id.is_valid() {
            return Err(FaceError::Registered(self.id));
        }
        self.is_on_demand = is_on_demand;
        Ok(())
    }

    /// Assign the id. Reserved for the face table.
    pub(crate) fn set_id(&mut self, id: FaceId, _: &IdAssigner) {
        debug_assert!(!self.id.is_valid(), "face {} already has an id", self.id);
        self.id = id;
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    pub fn on_receive_interest(&mut self) -> &mut EventEmitter<Interest> {
        &mut self.on_receive_interest
    }

    pub fn on_receive_data(&mut self) -> &mut EventEmitter<Data> {
        &mut self.on_receive_data
    }

    pub fn on_send_interest(&mut self) -> &mut EventEmitter<Interest> {
        &mut self.on_send_interest
    }

    pub fn on_send_data(&mut self) -> &mut EventEmitter<Data> {
        &mut self.on_send_data
    }

    pub fn on_fail(&mut self) -> &mut EventEmitter<String> {
        &mut self.on_fail
    }

    // -------------------------------------------------------------------------
    // Send path
    // -------------------------------------------------------------------------

    /// Hand an Interest to the transport.
    pub fn send_interest(&mut self, interest: Interest) {
        let packet = Packet::Interest(interest);
        if !self.transmit(&packet) {
            return;
        }
        if let Packet::Interest(interest) = &packet {
            self.counters.n_out_interests.increment();
            self.on_send_interest.emit(interest);
        }
    }

    /// Hand a Data packet to the transport.
    pub fn send_data(&mut self, data: Data) {
        let packet = Packet::Data(data);
        if !self.transmit(&packet) {
            return;
        }
        if let Packet::Data(data) = &packet {
            self.counters.n_out_data.increment();
            self.on_send_data.emit(data);
        }
    }

    fn transmit(&mut self, packet: &Packet) -> bool {
        if self.failed {
            debug!(face_id = %self.id, name = %packet.name(), "Dropping packet on closed face");
            return false;
        }
        match self.transport.send(packet) {
            Ok(()) => {
                self.counters.n_out_bytes.add(packet.wire().size());
                true
            }
            Err(e) => {
                self.fail(e.to_string());
                false
            }
        }
    }

    // -------------------------------------------------------------------------
    // Receive path
    // -------------------------------------------------------------------------

    /// Classify one delineated element and fire the matching receive event.
    ///
    /// Malformed input is logged and dropped; it never reaches the caller and
    /// leaves the counters untouched. Returns whether a packet was dispatched.
    pub fn decode_and_dispatch_input(&mut self, element: &Block) -> bool {
        let packet = if element.size() > MAX_PACKET_SIZE {
            Err(DecodeError::TooLarge {
                size: element.size(),
            })
        } else {
            self.decoder.decode(element)
        };

        let packet = match packet {
            Ok(packet) => packet,
            Err(e) => {
                warn!(face_id = %self.id, error = %e, "Dropping malformed input");
                return false;
            }
        };

        self.counters.n_in_bytes.add(element.size());
        match packet {
            Packet::Interest(interest) => {
                self.counters.n_in_interests.increment();
                self.on_receive_interest.emit(&interest);
            }
            Packet::Data(data) => {
                self.counters.n_in_data.increment();
                self.on_receive_data.emit(&data);
            }
        }
        true
    }

    /// Drain elements the transport has buffered and dispatch each.
    ///
    /// A transport found down afterwards fails the face. Returns the number
    /// of elements taken from the transport.
    pub fn process_incoming(&mut self) -> usize {
        let mut taken = 0;
        while !self.failed {
            let Some(element) = self.transport.poll_receive() else {
                break;
            };
            taken += 1;
            self.decode_and_dispatch_input(&element);
        }
        if !self.failed && !self.transport.is_up() {
            self.fail("transport went down");
        }
        taken
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Terminate all communication and fire the failure event.
    ///
    /// Later calls do nothing.
    pub fn close(&mut self) {
        self.fail(CLOSE_REASON);
    }

    /// Report a transport fault. The owner is expected to remove the face.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if self.failed {
            return;
        }
        self.failed = true;
        self.transport.close();

        let reason = reason.into();
        info!(face_id = %self.id, remote = %self.remote_uri, reason = %reason, "Face failed");
        self.on_fail.emit(&reason);
    }

    /// Release the transport without firing the failure event.
    pub(crate) fn release(&mut self) {
        self.failed = true;
        self.transport.close();
    }
}

impl fmt::Debug for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Face")
            .field("id", &self.id)
            .field("remote_uri", &self.remote_uri)
            .field("local_uri", &self.local_uri)
            .field("is_local", &self.is_local)
            .field("is_on_demand", &self.is_on_demand)
            .field("failed", &self.failed)
            .finish()
    }
}
