//! # FaceTable
//!
//! Owns every registered face and is the only place a `FaceId` is handed
//! out. Dynamic ids grow from `FaceId::FIRST_DYNAMIC` and are never reused,
//! even after the face holding one is removed.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::domain::{EventEmitter, FaceId};
use crate::error::FaceTableError;
use crate::service::Face;

/// Permission to assign a face id.
///
/// Only this module can construct one, so `Face::set_id` cannot be reached
/// from anywhere else.
#[derive(Debug)]
pub struct IdAssigner {
    _private: (),
}

impl IdAssigner {
    fn new() -> Self {
        Self { _private: () }
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::new()
    }
}

/// Registry of live faces keyed by id.
pub struct FaceTable {
    faces: BTreeMap<FaceId, Face>,
    last_id: FaceId,
    after_add: EventEmitter<FaceId>,
    before_remove: EventEmitter<FaceId>,
}

impl FaceTable {
    pub fn new() -> Self {
        Self {
            faces: BTreeMap::new(),
            last_id: FaceId::new(FaceId::FIRST_DYNAMIC.value() - 1),
            after_add: EventEmitter::new(),
            before_remove: EventEmitter::new(),
        }
    }

    /// Register a face under the next dynamic id.
    pub fn add(&mut self, face: Face) -> Result<FaceId, FaceTableError> {
        if face.id().is_valid() {
            return Err(FaceTableError::AlreadyRegistered(face.id()));
        }
        let id = self.last_id.next();
        self.last_id = id;
        self.insert(id, face);
        Ok(id)
    }

    /// Register a face under a reserved id such as `FaceId::NULL`.
    pub fn add_reserved(&mut self, face: Face, id: FaceId) -> Result<(), FaceTableError> {
        if face.id().is_valid() {
            return Err(FaceTableError::AlreadyRegistered(face.id()));
        }
        if !id.is_reserved() {
            return Err(FaceTableError::NotReserved(id));
        }
        if self.faces.contains_key(&id) {
            return Err(FaceTableError::IdInUse(id));
        }
        self.insert(id, face);
        Ok(())
    }

    fn insert(&mut self, id: FaceId, mut face: Face) {
        face.set_id(id, &IdAssigner::new());
        info!(
            face_id = %id,
            remote = %face.remote_uri(),
            local = %face.local_uri(),
            "Added face"
        );
        self.faces.insert(id, face);
        self.after_add.emit(&id);
    }

    pub fn get(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(&id)
    }

    pub fn get_mut(&mut self, id: FaceId) -> Option<&mut Face> {
        self.faces.get_mut(&id)
    }

    /// Faces in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Face> {
        self.faces.values()
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Unregister a face and release its transport.
    ///
    /// The face's failure event does not fire. Returns the detached face so
    /// the caller can read its final counters.
    pub fn remove(&mut self, id: FaceId) -> Option<Face> {
        if !self.faces.contains_key(&id) {
            debug!(face_id = %id, "Remove of unknown face ignored");
            return None;
        }
        self.before_remove.emit(&id);
        let mut face = self.faces.remove(&id)?;
        face.release();
        info!(face_id = %id, counters = %face.counters(), "Removed face");
        Some(face)
    }

    /// Fires with the id of each newly registered face.
    pub fn after_add(&mut self) -> &mut EventEmitter<FaceId> {
        &mut self.after_add
    }

    /// Fires with the id of a face just before it leaves the table.
    pub fn before_remove(&mut self) -> &mut EventEmitter<FaceId> {
        &mut self.before_remove
    }
}

impl Default for FaceTable {
    fn default() -> Self {
        Self::new()
    }
}
