//! Fetch TV media server client: SSDP discovery, device and service
//! descriptions, ContentDirectory browsing and media streams.

pub mod browser;
pub mod client;
pub mod description;
pub mod didl;
pub mod discovery;
pub mod services;
pub mod soap;
pub mod xml_parser;

pub use browser::{ContentDirectory, ROOT_OBJECT_ID};
pub use client::{HttpClient, HttpMediaStream};
pub use description::{discover_server, fetch_device, locate_server, VendorMatcher};
pub use didl::{decode_browse_response, extract_browse_result, parse_didl, DidlListing};
pub use discovery::{build_msearch, discover_locations, parse_location};
pub use services::{resolve_content_directory, resolve_url, BROWSE_ACTION};
pub use xml_parser::{parse_device_description, parse_scpd_actions};
