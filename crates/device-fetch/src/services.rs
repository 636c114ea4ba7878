//! Content-directory service resolution

use crate::client::HttpClient;
use crate::xml_parser::parse_scpd_actions;
use fetchtv_core::{Device, FetchError, Result, ServiceEndpoint};
use tracing::{debug, info};

/// Action a service must expose to be used as the content directory
pub const BROWSE_ACTION: &str = "Browse";

/// Find the first service of `device` whose SCPD lists a Browse action
pub async fn resolve_content_directory(
    client: &HttpClient,
    device: &Device,
) -> Result<ServiceEndpoint> {
    for service in &device.services {
        let scpd_url = resolve_url(&device.url, &service.scpd_url);
        debug!("Reading SCPD for {} from {}", service.service_type, scpd_url);

        let scpd = client.get_text(&scpd_url).await?;
        let actions = parse_scpd_actions(&scpd)?;

        if actions.iter().any(|action| action == BROWSE_ACTION) {
            let endpoint = ServiceEndpoint {
                control_url: resolve_url(&device.url, &service.control_url),
                service_type: service.service_type.clone(),
                scpd_url,
            };
            info!(
                "Using {} at {}",
                endpoint.service_type, endpoint.control_url
            );
            return Ok(endpoint);
        }
    }

    Err(FetchError::Protocol(format!(
        "no service of {} exposes a {} action",
        device.url, BROWSE_ACTION
    )))
}

/// Resolve a URL published by the device against the device's scheme and host
///
/// Absolute URLs are kept; paths are taken from the host root, a missing
/// leading `/` is added.
pub fn resolve_url(base: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }

    let origin = match base.find("://") {
        Some(pos) => {
            let after_scheme = &base[pos + 3..];
            match after_scheme.find('/') {
                Some(slash) => &base[..pos + 3 + slash],
                None => base,
            }
        }
        None => base.trim_end_matches('/'),
    };

    if url.starts_with('/') {
        format!("{}{}", origin, url)
    } else {
        format!("{}/{}", origin, url)
    }
}
