use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static RE_EPISODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^S\d+ E\d+").unwrap());

/// A UPnP device as published by its description document
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Location the description was fetched from
    pub url: String,
    pub device_type: String,
    pub friendly_name: String,
    pub manufacturer: String,
    pub manufacturer_url: String,
    pub model_description: String,
    pub model_name: String,
    pub model_number: String,
    #[serde(default)]
    pub services: Vec<ServiceDescriptor>,
}

/// One `<service>` entry of a device description, URLs as published by the device
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub service_type: String,
    pub service_id: String,
    pub scpd_url: String,
    pub control_url: String,
}

/// Resolved content-directory control endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    pub control_url: String,
    pub service_type: String,
    pub scpd_url: String,
}

/// A browsable container: a show, or one of the server's top level nodes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub parent_id: String,
    pub title: String,
    pub items: Vec<Item>,
}

/// A single recording (episode or movie)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub parent_id: String,
    pub title: String,
    pub class: String,
    pub description: String,
    /// Media URL of the first `res` element
    pub url: String,
    /// Declared size in bytes
    pub size: u64,
    /// Duration in whole seconds
    pub duration: u64,
    pub parent_name: String,
    /// Set once a probe has seen the sentinel content length
    #[serde(default)]
    pub recording: bool,
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        if RE_EPISODE.is_match(&self.title) {
            ItemKind::Episode
        } else {
            ItemKind::Movie
        }
    }

    pub fn summary(&self) -> ItemSummary {
        ItemSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            kind: self.kind(),
            duration: self.duration,
            size: self.size,
            description: self.description.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Episode,
    Movie,
}

/// Output view of an item
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub duration: u64,
    pub size: u64,
    pub description: String,
}

/// One show of a filtered listing
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowRecordings {
    pub id: String,
    pub title: String,
    pub items: Vec<Item>,
}

impl ShowRecordings {
    pub fn from_folder(folder: &Folder) -> Self {
        Self {
            id: folder.id.clone(),
            title: folder.title.clone(),
            items: Vec::new(),
        }
    }
}

/// Convert a `H:MM:SS[.fff]` timestamp to whole seconds
///
/// Unparsable segments make the whole value 0.
pub fn timestamp_to_seconds(ts: &str) -> u64 {
    let mut seconds = 0.0_f64;
    for segment in ts.trim().split(':') {
        match segment.trim().parse::<f64>() {
            Ok(value) => seconds = seconds * 60.0 + value,
            Err(_) => return 0,
        }
    }
    seconds.max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_to_seconds() {
        assert_eq!(timestamp_to_seconds("00:31:27"), 1887);
        assert_eq!(timestamp_to_seconds("03:31:27"), 12687);
        assert_eq!(timestamp_to_seconds("00:00:00"), 0);
        assert_eq!(timestamp_to_seconds("0:45:10.500"), 2710);
        assert_eq!(timestamp_to_seconds(""), 0);
        assert_eq!(timestamp_to_seconds("n/a"), 0);
    }

    #[test]
    fn test_item_kind() {
        let mut item = Item {
            title: "S4 E12".to_string(),
            ..Default::default()
        };
        assert_eq!(item.kind(), ItemKind::Episode);

        item.title = "S12 E3 - The Finale".to_string();
        assert_eq!(item.kind(), ItemKind::Episode);

        item.title = "The Matrix".to_string();
        assert_eq!(item.kind(), ItemKind::Movie);

        item.title = "Season S4 E12".to_string();
        assert_eq!(item.kind(), ItemKind::Movie);
    }

    #[test]
    fn test_summary_serializes_kind_as_type() {
        let item = Item {
            id: "7".to_string(),
            title: "S1 E1".to_string(),
            duration: 60,
            size: 1024,
            ..Default::default()
        };

        let json = serde_json::to_value(item.summary()).unwrap();
        assert_eq!(json["type"], "episode");
        assert_eq!(json["id"], "7");
        assert_eq!(json["size"], 1024);
    }
}
