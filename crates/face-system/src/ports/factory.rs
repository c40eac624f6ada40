//! # ProtocolFactory
//!
//! Capability interface implemented once per transport family. A factory
//! owns its channels and the set of URI schemes it serves, and validates and
//! applies its own section of the face system configuration.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use shared_types::FacePersistency;

use crate::domain::{ConfigContext, ConfigSection, FaceUri};
use crate::error::{ConfigError, CreationError};
use crate::ports::Channel;
use crate::service::Face;

/// Invoked with the new face on success.
pub type FaceCreatedCallback = Box<dyn FnOnce(Face) + Send>;

/// Invoked with the reason on failure.
pub type FaceCreationFailedCallback = Box<dyn FnOnce(CreationError) + Send>;

/// Parameters of one face creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFaceRequest {
    pub uri: FaceUri,
    pub persistency: FacePersistency,
    pub want_local_fields_enabled: bool,
}

/// One-shot completion for a face creation request.
///
/// `succeed` and `fail` consume the handle, so at most one outcome can be
/// delivered. Dropping an uncompleted handle delivers a 500 failure, so the
/// caller always hears back exactly once.
pub struct CreateFaceCompletion {
    on_created: Option<FaceCreatedCallback>,
    on_failure: Option<FaceCreationFailedCallback>,
}

impl CreateFaceCompletion {
    pub fn new(on_created: FaceCreatedCallback, on_failure: FaceCreationFailedCallback) -> Self {
        Self {
            on_created: Some(on_created),
            on_failure: Some(on_failure),
        }
    }

    /// Deliver the created face.
    pub fn succeed(mut self, face: Face) {
        self.on_failure = None;
        if let Some(on_created) = self.on_created.take() {
            on_created(face);
        }
    }

    /// Deliver a failure.
    pub fn fail(mut self, error: CreationError) {
        self.on_created = None;
        if let Some(on_failure) = self.on_failure.take() {
            on_failure(error);
        }
    }
}

impl Drop for CreateFaceCompletion {
    fn drop(&mut self) {
        if let Some(on_failure) = self.on_failure.take() {
            tracing::warn!("face creation request dropped without an outcome");
            on_failure(CreationError::internal("face creation abandoned"));
        }
    }
}

impl fmt::Debug for CreateFaceCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateFaceCompletion")
            .field("pending", &self.on_failure.is_some())
            .finish()
    }
}

/// Per-transport-family driver.
pub trait ProtocolFactory: Send {
    /// Schemes this factory currently serves.
    ///
    /// Replaced wholesale, and only by a successful commit pass.
    fn provided_schemes(&self) -> &BTreeSet<String>;

    /// Validate (dry run) or apply (commit) this factory's section.
    ///
    /// Called exactly once per pass, with `None` when the document has no
    /// section for this factory. A dry run must report every error the
    /// commit would report and must not touch channels or schemes.
    fn process_config(
        &mut self,
        section: Option<&ConfigSection>,
        context: &mut ConfigContext,
    ) -> Result<(), ConfigError>;

    /// Create a face, or reuse a channel to reach the target.
    ///
    /// The outcome goes through `completion`, possibly after this call has
    /// returned, and always on the processing context.
    fn create_face(&mut self, request: CreateFaceRequest, completion: CreateFaceCompletion);

    /// Channels currently owned by this factory.
    fn get_channels(&self) -> Vec<Arc<dyn Channel>>;
}
