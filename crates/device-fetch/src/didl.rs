//! Decoding of Browse responses
//!
//! The SOAP response carries the DIDL-Lite listing as escaped text inside its
//! `Result` element, so decoding takes two passes: the envelope is parsed
//! first, then the recovered text is parsed again as its own document.

use crate::xml_parser::{attribute, walk, Node};
use fetchtv_core::{timestamp_to_seconds, Folder, Item, Result};

const CONTAINER_CLASS: &str = "object.container";

/// Children returned by one Browse call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DidlListing {
    pub containers: Vec<Folder>,
    pub items: Vec<Item>,
}

/// Decode a Browse response body: envelope first, then the DIDL-Lite payload
pub fn decode_browse_response(envelope: &str) -> Result<DidlListing> {
    match extract_browse_result(envelope)? {
        Some(didl) => parse_didl(&didl),
        None => Ok(DidlListing::default()),
    }
}

/// Stage one: the unescaped text of the envelope's `Result` element
///
/// `None` when the element is missing or empty.
pub fn extract_browse_result(envelope: &str) -> Result<Option<String>> {
    let mut result = None;

    walk(envelope, |node| {
        if let Node::Close([.., name], text) = node {
            if name == "Result" && result.is_none() && !text.is_empty() {
                result = Some(text.to_string());
            }
        }
        Ok(())
    })?;

    Ok(result)
}

enum Entry {
    Container { folder: Folder, class: String },
    Item { item: Item, res_seen: usize },
}

/// Stage two: parse a DIDL-Lite document
///
/// Only `container` elements whose class is an object container become
/// folders. Items keep the URL and attributes of their first `res`.
pub fn parse_didl(didl: &str) -> Result<DidlListing> {
    let mut listing = DidlListing::default();
    let mut current: Option<Entry> = None;

    walk(didl, |node| {
        match node {
            Node::Open([_, kind], element) => {
                let id = attribute(element, "id")?.unwrap_or_default();
                let parent_id = attribute(element, "parentID")?.unwrap_or_default();
                current = match kind.as_str() {
                    "container" => Some(Entry::Container {
                        folder: Folder {
                            id,
                            parent_id,
                            ..Default::default()
                        },
                        class: String::new(),
                    }),
                    "item" => Some(Entry::Item {
                        item: Item {
                            id,
                            parent_id,
                            ..Default::default()
                        },
                        res_seen: 0,
                    }),
                    _ => None,
                };
            }
            Node::Open([_, _, field], element) if field == "res" => {
                if let Some(Entry::Item { item, res_seen }) = current.as_mut() {
                    *res_seen += 1;
                    if *res_seen == 1 {
                        item.size = attribute(element, "size")?
                            .and_then(|size| size.trim().parse().ok())
                            .unwrap_or(0);
                        item.duration = attribute(element, "duration")?
                            .map(|duration| timestamp_to_seconds(&duration))
                            .unwrap_or(0);
                        item.parent_name = attribute(element, "parentTaskName")?.unwrap_or_default();
                    }
                }
            }
            Node::Close([_, _, field], text) => match current.as_mut() {
                Some(Entry::Container { folder, class }) => match field.as_str() {
                    "title" => folder.title = text.to_string(),
                    "class" => *class = text.to_string(),
                    _ => {}
                },
                Some(Entry::Item { item, res_seen }) => match field.as_str() {
                    "title" => item.title = text.to_string(),
                    "class" => item.class = text.to_string(),
                    "description" => item.description = text.to_string(),
                    "res" if *res_seen == 1 && item.url.is_empty() => item.url = text.to_string(),
                    _ => {}
                },
                None => {}
            },
            Node::Close([_, _], _) => match current.take() {
                Some(Entry::Container { folder, class }) => {
                    if class.contains(CONTAINER_CLASS) {
                        listing.containers.push(folder);
                    }
                }
                Some(Entry::Item { item, .. }) => listing.items.push(item),
                None => {}
            },
            _ => {}
        }
        Ok(())
    })?;

    Ok(listing)
}
