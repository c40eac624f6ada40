//! Factory for in-process faces.
//!
//! ```toml
//! [face_system.internal]
//! enabled = true     # default
//! max_faces = 256    # default, at least 1
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Deserialize;
use shared_types::FacePersistency;
use tracing::{debug, info};

use super::channel::{InternalChannel, INTERNAL_SCHEME};
use crate::domain::{ConfigContext, ConfigSection};
use crate::error::{ConfigError, CreationError};
use crate::ports::{Channel, CreateFaceCompletion, CreateFaceRequest, ProtocolFactory};
use crate::service::Face;

/// Path reported for errors when the section is absent.
const DEFAULT_PATH: &str = "face_system.internal";

/// Options of the `internal` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InternalOptions {
    pub enabled: bool,
    pub max_faces: u64,
}

impl Default for InternalOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            max_faces: 256,
        }
    }
}

impl InternalOptions {
    fn from_section(section: Option<&ConfigSection>) -> Result<Self, ConfigError> {
        let Some(section) = section else {
            return Ok(Self::default());
        };
        let options: Self = section.deserialize()?;
        if options.max_faces == 0 {
            return Err(ConfigError::InvalidValue {
                path: format!("{}.max_faces", section.path()),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(options)
    }
}

/// Shared view of the factory's current channel.
///
/// Stays valid after the factory is handed to a `FaceSystem`, so the
/// application side can find the clients of newly created faces.
#[derive(Debug, Clone, Default)]
pub struct ChannelSlot(Arc<Mutex<Option<Arc<InternalChannel>>>>);

impl ChannelSlot {
    /// The channel, if the factory is enabled.
    pub fn get(&self) -> Option<Arc<InternalChannel>> {
        self.0.lock().clone()
    }
}

/// Creates local faces backed by in-memory queues.
#[derive(Debug)]
pub struct InternalFactory {
    provided_schemes: BTreeSet<String>,
    options: InternalOptions,
    channel: ChannelSlot,
}

impl InternalFactory {
    /// A factory with no channel and no schemes until its first commit.
    pub fn new() -> Self {
        Self {
            provided_schemes: BTreeSet::new(),
            options: InternalOptions::default(),
            channel: ChannelSlot::default(),
        }
    }

    pub fn options(&self) -> &InternalOptions {
        &self.options
    }

    pub fn channel_slot(&self) -> ChannelSlot {
        self.channel.clone()
    }
}

impl Default for InternalFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolFactory for InternalFactory {
    fn provided_schemes(&self) -> &BTreeSet<String> {
        &self.provided_schemes
    }

    fn process_config(
        &mut self,
        section: Option<&ConfigSection>,
        context: &mut ConfigContext,
    ) -> Result<(), ConfigError> {
        let options = InternalOptions::from_section(section)?;
        if context.is_dry_run {
            return Ok(());
        }

        let mut slot = self.channel.0.lock();
        if options.enabled {
            if slot.is_none() {
                *slot = Some(Arc::new(InternalChannel::new()));
                info!(
                    path = section.map_or(DEFAULT_PATH, ConfigSection::path),
                    "Internal channel listening"
                );
            }
            self.provided_schemes = BTreeSet::from([INTERNAL_SCHEME.to_string()]);
        } else {
            if slot.take().is_some() {
                info!("Internal channel closed");
            }
            self.provided_schemes = BTreeSet::new();
        }
        drop(slot);

        debug!(
            enabled = options.enabled,
            max_faces = options.max_faces,
            "Internal factory configured"
        );
        self.options = options;
        Ok(())
    }

    fn create_face(&mut self, request: CreateFaceRequest, completion: CreateFaceCompletion) {
        let Some(channel) = self.channel.get() else {
            completion.fail(CreationError::unavailable("No channels available to connect"));
            return;
        };
        if request.persistency == FacePersistency::OnDemand {
            completion.fail(CreationError::not_acceptable(
                "Outgoing on-demand faces are not supported",
            ));
            return;
        }
        if channel.size() as u64 >= self.options.max_faces {
            completion.fail(CreationError::forbidden(format!(
                "Internal face limit of {} reached",
                self.options.max_faces
            )));
            return;
        }
        if request.uri.scheme() != INTERNAL_SCHEME {
            completion.fail(CreationError::bad_request(format!(
                "Scheme {} is not served by this factory",
                request.uri.scheme()
            )));
            return;
        }

        let (remote, transport) = channel.open_link();
        let face = Face::new(remote, channel.uri().clone(), Box::new(transport))
            .with_local(true)
            .with_local_fields(request.want_local_fields_enabled);
        completion.succeed(face);
    }

    fn get_channels(&self) -> Vec<Arc<dyn Channel>> {
        self.channel
            .get()
            .into_iter()
            .map(|channel| channel as Arc<dyn Channel>)
            .collect()
    }
}
