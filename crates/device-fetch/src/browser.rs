//! ContentDirectory browsing and catalog assembly

use crate::client::HttpClient;
use crate::didl::{decode_browse_response, DidlListing};
use crate::soap::browse_envelope;
use fetchtv_core::{Folder, Result, ServiceEndpoint};
use tracing::{debug, info};

/// Object id of the content directory root
pub const ROOT_OBJECT_ID: &str = "0";

/// Browse client bound to one resolved content-directory endpoint
pub struct ContentDirectory<'a> {
    client: &'a HttpClient,
    endpoint: ServiceEndpoint,
}

impl<'a> ContentDirectory<'a> {
    pub fn new(client: &'a HttpClient, endpoint: ServiceEndpoint) -> Self {
        Self { client, endpoint }
    }

    /// One Browse RPC for the direct children of `object_id`
    pub async fn browse(&self, object_id: &str) -> Result<DidlListing> {
        debug!("Browsing object {}", object_id);

        let body = browse_envelope(&self.endpoint.service_type, object_id);
        let response = self
            .client
            .post_soap(
                &self.endpoint.control_url,
                &self.endpoint.service_type,
                "Browse",
                body,
            )
            .await?;

        let listing = decode_browse_response(&response)?;
        debug!(
            "Object {}: {} container(s), {} item(s)",
            object_id,
            listing.containers.len(),
            listing.items.len()
        );
        Ok(listing)
    }

    /// Containers of `object_id`, each filled with the items one level below it
    pub async fn find_directories(&self, object_id: &str) -> Result<Vec<Folder>> {
        let mut folders = self.browse(object_id).await?.containers;
        for folder in &mut folders {
            folder.items = self.browse(&folder.id).await?.items;
        }
        Ok(folders)
    }

    /// Show folders (with their episodes) below the folder titled `recordings_title`
    ///
    /// A server without that folder has an empty catalog.
    pub async fn recordings(&self, recordings_title: &str) -> Result<Vec<Folder>> {
        let base_folders = self.find_directories(ROOT_OBJECT_ID).await?;
        let Some(recordings) = base_folders
            .iter()
            .find(|folder| folder.title == recordings_title)
        else {
            info!("No {:?} folder on the server", recordings_title);
            return Ok(Vec::new());
        };

        let shows = self.find_directories(&recordings.id).await?;
        info!(
            "Catalog: {} show(s), {} recording(s)",
            shows.len(),
            shows.iter().map(|show| show.items.len()).sum::<usize>()
        );
        Ok(shows)
    }
}
