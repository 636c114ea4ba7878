//! Device description fetching and vendor validation

use crate::client::HttpClient;
use crate::discovery::discover_locations;
use crate::xml_parser::parse_device_description;
use fetchtv_core::{Device, FetchConfig, Result, ServerConfig};
use tracing::{debug, info, warn};

/// Decides whether a described device is the appliance we are looking for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorMatcher {
    manufacturer_url: String,
}

impl VendorMatcher {
    pub fn new(manufacturer_url: impl Into<String>) -> Self {
        Self {
            manufacturer_url: manufacturer_url.into(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.manufacturer_url.clone())
    }

    pub fn matches(&self, device: &Device) -> bool {
        device.manufacturer_url == self.manufacturer_url
    }
}

/// Fetch and parse the description published at `location`
pub async fn fetch_device(client: &HttpClient, location: &str) -> Result<Device> {
    debug!("Fetching device description from {}", location);
    let xml = client.get_text(location).await?;
    parse_device_description(&xml, location)
}

/// Fetch every candidate in turn and return the first accepted device
///
/// A candidate that cannot be fetched or parsed fails the whole lookup;
/// devices from other vendors are skipped.
pub async fn locate_server<'a, I>(
    client: &HttpClient,
    locations: I,
    matcher: &VendorMatcher,
) -> Result<Option<Device>>
where
    I: IntoIterator<Item = &'a str>,
{
    for location in locations {
        let device = fetch_device(client, location).await?;
        if matcher.matches(&device) {
            info!(
                "Found {} ({} {}) at {}",
                device.friendly_name, device.manufacturer, device.model_name, location
            );
            return Ok(Some(device));
        }
        debug!(
            "Ignoring {} at {} (manufacturer URL {:?})",
            device.friendly_name, location, device.manufacturer_url
        );
    }
    Ok(None)
}

/// Locate the server, by SSDP discovery or directly when an address is given
pub async fn discover_server(
    client: &HttpClient,
    config: &FetchConfig,
    ip: Option<&str>,
    port: Option<u16>,
) -> Result<Option<Device>> {
    let locations: Vec<String> = match ip {
        Some(ip) => vec![config.server.location_for(ip, port)],
        None => discover_locations(&config.discovery).await?.into_iter().collect(),
    };

    let matcher = VendorMatcher::from_config(&config.server);
    let device = locate_server(client, locations.iter().map(String::as_str), &matcher).await?;
    if device.is_none() {
        warn!("Unable to locate a server matching {:?}", config.server.manufacturer_url);
    }
    Ok(device)
}
