//! # FaceSystem
//!
//! Registry of named protocol factories. Drives two-phase configuration
//! reconciliation and routes face creation requests by URI scheme.
//!
//! ```text
//! reload(section)
//!   │
//!   ├─ unknown subsection? ──────────────► UnrecognizedSection (nothing called)
//!   │
//!   ├─ VALIDATE  f1.process_config(dry)  f2.process_config(dry) ...
//!   │            any error ─────────────► abort, nothing applied
//!   │
//!   ├─ COMMIT    f1.process_config(live) f2.process_config(live) ...
//!   │
//!   └─ rebuild scheme table from every factory's provided schemes
//! ```
//!
//! Factories are called in registration order. The scheme table is derived
//! state: it is thrown away and rebuilt after every commit pass, never
//! patched.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use shared_types::FacePersistency;
use tracing::{debug, error, info, warn};

use crate::adapters::internal::InternalFactory;
use crate::domain::{ConfigContext, ConfigSection, FaceUri};
use crate::error::{ConfigError, CreationError};
use crate::ports::{
    CreateFaceCompletion, CreateFaceRequest, FaceCreatedCallback, FaceCreationFailedCallback,
    ProtocolFactory,
};

#[cfg(test)]
mod tests;

/// Registration name of the in-process factory.
pub const INTERNAL_FACTORY: &str = "internal";

/// Registry of protocol factories.
pub struct FaceSystem {
    /// In registration order.
    factories: Vec<(String, Box<dyn ProtocolFactory>)>,
    /// Scheme to index into `factories`.
    factory_by_scheme: BTreeMap<String, usize>,
}

impl FaceSystem {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
            factory_by_scheme: BTreeMap::new(),
        }
    }

    /// A registry holding the built-in factories.
    pub fn with_default_factories() -> Self {
        let mut system = Self::new();
        system
            .factories
            .push((INTERNAL_FACTORY.to_string(), Box::new(InternalFactory::new())));
        system
    }

    /// Register a factory under `name`.
    ///
    /// The factory's schemes become routable after the next commit pass.
    pub fn add_factory(
        &mut self,
        name: impl Into<String>,
        factory: Box<dyn ProtocolFactory>,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        if self.factory_index(&name).is_some() {
            return Err(ConfigError::DuplicateFactory(name));
        }
        info!(factory = %name, "Registered protocol factory");
        self.factories.push((name, factory));
        Ok(())
    }

    /// Look up a factory by registration name.
    pub fn get_factory_by_id(&self, name: &str) -> Option<&dyn ProtocolFactory> {
        self.factory_index(name)
            .map(|index| self.factories[index].1.as_ref())
    }

    /// Registered factories in registration order.
    pub fn list_protocol_factories(&self) -> impl Iterator<Item = (&str, &dyn ProtocolFactory)> {
        self.factories
            .iter()
            .map(|(name, factory)| (name.as_str(), factory.as_ref()))
    }

    /// The factory serving `scheme`, if exactly one does.
    pub fn get_factory_by_scheme(&self, scheme: &str) -> Option<&dyn ProtocolFactory> {
        self.factory_by_scheme
            .get(scheme)
            .and_then(|&index| self.factories.get(index))
            .map(|(_, factory)| factory.as_ref())
    }

    /// Schemes currently routable, in sorted order.
    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.factory_by_scheme.keys().map(String::as_str)
    }

    /// Run one reconciliation pass over the `face_system` section.
    ///
    /// A dry run only validates. A commit applies each factory's subsection
    /// and then rebuilds the scheme table, even if a factory failed part way.
    pub fn process_config(
        &mut self,
        section: &ConfigSection,
        is_dry_run: bool,
    ) -> Result<(), ConfigError> {
        // Resolve every subsection before any factory sees the document.
        for key in section.keys() {
            if self.factory_index(key).is_none() {
                error!(section = %section.path(), key, "Unrecognized face system section");
                return Err(ConfigError::UnrecognizedSection {
                    parent: section.path().to_string(),
                    name: key.to_string(),
                });
            }
        }
        let subsections = self
            .factories
            .iter()
            .map(|(name, _)| section.subsection(name))
            .collect::<Result<Vec<_>, _>>()?;

        let mut context = ConfigContext::new(is_dry_run);
        let mut outcome = Ok(());
        for ((name, factory), subsection) in self.factories.iter_mut().zip(&subsections) {
            debug!(
                factory = %name,
                dry_run = is_dry_run,
                present = subsection.is_some(),
                "Processing factory config"
            );
            if let Err(e) = factory.process_config(subsection.as_ref(), &mut context) {
                warn!(factory = %name, dry_run = is_dry_run, error = %e, "Factory rejected config");
                outcome = Err(e);
                break;
            }
        }

        if is_dry_run {
            return outcome;
        }
        let rebuilt = self.rebuild_scheme_table();
        outcome.and(rebuilt)
    }

    /// Validate `section`, then apply it. Nothing is applied if validation
    /// fails.
    pub fn reload(&mut self, section: &ConfigSection) -> Result<(), ConfigError> {
        self.process_config(section, true)?;
        self.process_config(section, false)?;
        info!(
            factories = self.factories.len(),
            schemes = self.factory_by_scheme.len(),
            "Face system configuration applied"
        );
        Ok(())
    }

    /// Create a face for `uri` through the factory serving its scheme.
    ///
    /// Exactly one of the callbacks runs, possibly after this call returns.
    pub fn create_face(
        &mut self,
        uri: &str,
        persistency: FacePersistency,
        want_local_fields_enabled: bool,
        on_created: FaceCreatedCallback,
        on_failure: FaceCreationFailedCallback,
    ) {
        let completion = CreateFaceCompletion::new(on_created, on_failure);

        let uri = match FaceUri::parse(uri) {
            Ok(uri) => uri,
            Err(e) => {
                debug!(uri, error = %e, "Rejecting face creation");
                completion.fail(CreationError::bad_request("Malformed URI"));
                return;
            }
        };

        let Some(&index) = self.factory_by_scheme.get(uri.scheme()) else {
            debug!(uri = %uri, scheme = uri.scheme(), "No factory for scheme");
            completion.fail(CreationError::not_acceptable("Unsupported protocol"));
            return;
        };
        let Some((name, factory)) = self.factories.get_mut(index) else {
            completion.fail(CreationError::internal("scheme table out of date"));
            return;
        };

        debug!(uri = %uri, factory = %name, persistency = %persistency, "Creating face");
        factory.create_face(
            CreateFaceRequest {
                uri,
                persistency,
                want_local_fields_enabled,
            },
            completion,
        );
    }

    fn factory_index(&self, name: &str) -> Option<usize> {
        self.factories.iter().position(|(n, _)| n == name)
    }

    /// Derive the scheme table from the factories' current scheme sets.
    ///
    /// A scheme claimed by more than one factory routes to none of them.
    fn rebuild_scheme_table(&mut self) -> Result<(), ConfigError> {
        let mut table = BTreeMap::new();
        let mut contested = BTreeSet::new();
        let mut conflict = None;

        for (index, (name, factory)) in self.factories.iter().enumerate() {
            for scheme in factory.provided_schemes() {
                match table.entry(scheme.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert(index);
                    }
                    Entry::Occupied(slot) => {
                        let first = &self.factories[*slot.get()].0;
                        warn!(
                            scheme = %scheme,
                            first = %first,
                            second = %name,
                            "Scheme provided twice"
                        );
                        conflict.get_or_insert_with(|| ConfigError::SchemeConflict {
                            scheme: scheme.clone(),
                            first: first.clone(),
                            second: name.clone(),
                        });
                        contested.insert(scheme.clone());
                    }
                }
            }
        }
        for scheme in &contested {
            table.remove(scheme);
        }

        for (scheme, index) in &table {
            debug!(scheme = %scheme, factory = %self.factories[*index].0, "Scheme routed");
        }
        self.factory_by_scheme = table;

        match conflict {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for FaceSystem {
    fn default() -> Self {
        Self::new()
    }
}
