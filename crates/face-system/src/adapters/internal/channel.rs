//! The single listening channel of the internal factory.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::transport::{is_open, InternalClient, InternalTransport, SharedLink};
use crate::domain::FaceUri;
use crate::ports::Channel;

/// Scheme served by the internal factory.
pub const INTERNAL_SCHEME: &str = "internal";

#[derive(Debug, Default)]
struct Directory {
    next_client: u64,
    links: BTreeMap<FaceUri, SharedLink>,
}

/// Listening endpoint `internal://` producing one link per face.
#[derive(Debug)]
pub struct InternalChannel {
    uri: FaceUri,
    directory: Mutex<Directory>,
}

impl InternalChannel {
    pub(crate) fn new() -> Self {
        Self {
            uri: FaceUri::build(INTERNAL_SCHEME, "", None, ""),
            directory: Mutex::new(Directory::default()),
        }
    }

    /// Open a new link; returns the face's remote URI and its transport.
    pub(crate) fn open_link(&self) -> (FaceUri, InternalTransport) {
        let mut directory = self.directory.lock();
        directory.links.retain(|_, link| is_open(link));

        directory.next_client += 1;
        let remote = FaceUri::build(
            INTERNAL_SCHEME,
            &format!("client-{}", directory.next_client),
            None,
            "",
        );
        let link = SharedLink::default();
        directory.links.insert(remote.clone(), Arc::clone(&link));
        debug!(remote = %remote, live = directory.links.len(), "Opened internal link");
        (remote, InternalTransport::new(link))
    }

    /// Application handle for the face whose remote URI is `remote`.
    pub fn client(&self, remote: &FaceUri) -> Option<InternalClient> {
        let directory = self.directory.lock();
        directory
            .links
            .get(remote)
            .filter(|link| is_open(link))
            .map(|link| InternalClient::new(remote.clone(), Arc::clone(link)))
    }
}

impl Channel for InternalChannel {
    fn uri(&self) -> &FaceUri {
        &self.uri
    }

    fn size(&self) -> usize {
        self.directory
            .lock()
            .links
            .values()
            .filter(|link| is_open(link))
            .count()
    }

    fn is_listening(&self) -> bool {
        true
    }
}
