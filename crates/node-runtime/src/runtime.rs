//! # Node Runtime
//!
//! Owns the face system and the face table and runs on the single processing
//! context. Everything that finishes "later" (face creation, face failure)
//! comes back as a `FaceEvent` through an unbounded channel that the main
//! loop drains:
//!
//! ```text
//!  create_face ──► FaceSystem ──► factory ──► completion ─┐
//!                                                         │ FaceEvent::Created
//!  Face::on_fail ─────────────────────────────────────────┤ FaceEvent::Failed
//!                                                         ▼
//!                           main loop ──► handle_event ──► FaceTable
//! ```

use face_system::{
    ConfigError, CreationError, Face, FaceId, FaceSystem, FaceTable, FaceUri, NullTransport,
};
use shared_types::FacePersistency;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::config::{NodeConfig, StaticFace};

/// Completion reported back to the main loop.
#[derive(Debug)]
pub enum FaceEvent {
    /// A face creation request finished.
    Created {
        uri: String,
        result: Result<Face, CreationError>,
    },
    /// A registered face reported a fault and must be removed.
    Failed { id: FaceId, reason: String },
}

/// The daemon's face management state.
pub struct NodeRuntime {
    face_system: FaceSystem,
    face_table: FaceTable,
    events: UnboundedSender<FaceEvent>,
}

impl NodeRuntime {
    /// Create the runtime and the receiver for its events.
    ///
    /// The reserved null face is registered immediately.
    pub fn new(face_system: FaceSystem) -> (Self, UnboundedReceiver<FaceEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let mut runtime = Self {
            face_system,
            face_table: FaceTable::new(),
            events,
        };
        runtime.add_reserved_faces();
        (runtime, receiver)
    }

    fn add_reserved_faces(&mut self) {
        let uri = match FaceUri::parse("null://") {
            Ok(uri) => uri,
            Err(e) => {
                error!(error = %e, "Invalid null face URI");
                return;
            }
        };
        let null = Face::new(uri.clone(), uri, Box::new(NullTransport::new()));
        if let Err(e) = self.face_table.add_reserved(null, FaceId::NULL) {
            error!(error = %e, "Failed to register null face");
        }
    }

    pub fn face_system(&self) -> &FaceSystem {
        &self.face_system
    }

    pub fn face_table(&self) -> &FaceTable {
        &self.face_table
    }

    /// Apply the `[face_system]` section in two phases.
    ///
    /// A validation error leaves everything as it was. A commit error may
    /// leave the factories partly reconfigured.
    pub fn reload(&mut self, config: &NodeConfig) -> Result<(), ConfigError> {
        let section = &config.face_system;
        if let Err(e) = self.face_system.process_config(section, true) {
            warn!(error = %e, "Face system config rejected; previous configuration kept");
            return Err(e);
        }
        if let Err(e) = self.face_system.process_config(section, false) {
            let schemes: Vec<&str> = self.face_system.schemes().collect();
            error!(error = %e, ?schemes, "Face system config partly applied");
            return Err(e);
        }

        let schemes: Vec<&str> = self.face_system.schemes().collect();
        info!(?schemes, "Face system reloaded");
        Ok(())
    }

    /// Request the faces listed under `[[runtime.faces]]`.
    pub fn create_static_faces(&mut self, config: &NodeConfig) {
        for face in &config.runtime.faces {
            let StaticFace {
                uri,
                persistency,
                local_fields,
            } = face;
            self.create_face(uri, *persistency, *local_fields);
        }
    }

    /// Request a face; the outcome arrives as `FaceEvent::Created`.
    pub fn create_face(&mut self, uri: &str, persistency: FacePersistency, local_fields: bool) {
        let created = self.events.clone();
        let failed = self.events.clone();
        let created_uri = uri.to_string();
        let failed_uri = uri.to_string();

        self.face_system.create_face(
            uri,
            persistency,
            local_fields,
            Box::new(move |face: Face| {
                let _ = created.send(FaceEvent::Created {
                    uri: created_uri,
                    result: Ok(face),
                });
            }),
            Box::new(move |err: CreationError| {
                let _ = failed.send(FaceEvent::Created {
                    uri: failed_uri,
                    result: Err(err),
                });
            }),
        );
    }

    /// Apply one event from the receiver.
    pub fn handle_event(&mut self, event: FaceEvent) {
        match event {
            FaceEvent::Created { uri, result } => match result {
                Ok(face) => self.register(face),
                Err(e) => warn!(
                    uri = %uri,
                    status = e.status,
                    reason = %e.reason,
                    "Face creation failed"
                ),
            },
            FaceEvent::Failed { id, reason } => {
                debug!(face_id = %id, reason = %reason, "Removing failed face");
                self.face_table.remove(id);
            }
        }
    }

    fn register(&mut self, face: Face) {
        let id = match self.face_table.add(face) {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "Failed to register face");
                return;
            }
        };
        let Some(face) = self.face_table.get_mut(id) else {
            return;
        };

        let events = self.events.clone();
        face.on_fail().connect(move |reason: &String| {
            let _ = events.send(FaceEvent::Failed {
                id,
                reason: reason.clone(),
            });
        });
        face.on_receive_interest().connect(move |interest| {
            debug!(face_id = %id, name = %interest.name(), "Interest received")
        });
        face.on_receive_data().connect(move |data| {
            debug!(face_id = %id, name = %data.name(), "Data received")
        });
    }

    /// Let every face drain its transport.
    pub fn poll_faces(&mut self) -> usize {
        let ids: Vec<FaceId> = self.face_table.iter().map(Face::id).collect();
        let mut taken = 0;
        for id in ids {
            if let Some(face) = self.face_table.get_mut(id) {
                taken += face.process_incoming();
            }
        }
        taken
    }

    /// Close and remove every face.
    pub fn shutdown(&mut self) {
        let ids: Vec<FaceId> = self.face_table.iter().map(Face::id).collect();
        for id in ids {
            if let Some(face) = self.face_table.remove(id) {
                info!(
                    face_id = %id,
                    remote = %face.remote_uri(),
                    counters = %face.counters(),
                    "Face closed"
                );
            }
        }
    }
}
