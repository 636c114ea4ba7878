//! XML parsing for UPnP documents using quick-xml
//!
//! Elements are matched by local name, so namespace prefixes (`dc:`, `upnp:`,
//! default namespaces) do not matter.

use fetchtv_core::{Device, FetchError, Result, ServiceDescriptor};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One step of a document walk
pub(crate) enum Node<'a> {
    /// An element opened; the path includes the element itself
    Open(&'a [String], &'a BytesStart<'a>),
    /// An element closed with the (trimmed) text found directly inside it
    Close(&'a [String], &'a str),
}

/// Walk a document, reporting element open/close events with their path
///
/// Fails on malformed XML, including documents that end with open elements.
pub(crate) fn walk<F>(xml: &str, mut visit: F) -> Result<()>
where
    F: FnMut(Node<'_>) -> Result<()>,
{
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut texts: Vec<String> = Vec::new();
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                saw_root = true;
                path.push(local_name(&e));
                texts.push(String::new());
                visit(Node::Open(&path, &e))?;
            }
            Ok(Event::Empty(e)) => {
                saw_root = true;
                path.push(local_name(&e));
                visit(Node::Open(&path, &e))?;
                visit(Node::Close(&path, ""))?;
                path.pop();
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| xml_error(&reader, err))?;
                if let Some(current) = texts.last_mut() {
                    current.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = texts.last_mut() {
                    current.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                let text = texts.pop().unwrap_or_default();
                visit(Node::Close(&path, text.trim()))?;
                path.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(&reader, e)),
            _ => {}
        }
    }

    if let Some(open) = path.last() {
        return Err(FetchError::Protocol(format!(
            "XML document ends inside <{}>",
            open
        )));
    }
    if !saw_root {
        return Err(FetchError::Protocol("XML document has no root element".to_string()));
    }
    Ok(())
}

/// Value of the attribute with the given local name
pub(crate) fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| FetchError::Protocol(format!("invalid XML attribute: {}", e)))?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| FetchError::Protocol(format!("invalid XML attribute: {}", e)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}

fn xml_error(reader: &Reader<&[u8]>, e: quick_xml::Error) -> FetchError {
    FetchError::Protocol(format!(
        "XML parsing error at position {}: {}",
        reader.buffer_position(),
        e
    ))
}

/// Parse a UPnP device description
///
/// Identity fields come from `root/device`; services from every
/// `serviceList/service` block. Missing fields are empty strings.
pub fn parse_device_description(xml: &str, location: &str) -> Result<Device> {
    let mut device = Device {
        url: location.to_string(),
        ..Default::default()
    };
    let mut current_service: Option<ServiceDescriptor> = None;

    walk(xml, |node| {
        match node {
            Node::Open(path, _) => {
                if is_service(path) {
                    current_service = Some(ServiceDescriptor::default());
                }
            }
            Node::Close(path, text) => {
                if is_service(path) {
                    if let Some(service) = current_service.take() {
                        if !service.service_type.is_empty() {
                            device.services.push(service);
                        }
                    }
                } else if let [root, dev, field] = path {
                    if root == "root" && dev == "device" {
                        set_device_field(&mut device, field, text);
                    }
                } else if let (Some(service), [.., list, svc, field]) = (current_service.as_mut(), path) {
                    if list == "serviceList" && svc == "service" {
                        set_service_field(service, field, text);
                    }
                }
            }
        }
        Ok(())
    })?;

    Ok(device)
}

/// Names of the actions listed in a service description (SCPD)
pub fn parse_scpd_actions(xml: &str) -> Result<Vec<String>> {
    let mut actions = Vec::new();

    walk(xml, |node| {
        if let Node::Close([.., list, action, name], text) = node {
            if list == "actionList" && action == "action" && name == "name" {
                actions.push(text.to_string());
            }
        }
        Ok(())
    })?;

    Ok(actions)
}

fn is_service(path: &[String]) -> bool {
    matches!(path, [.., list, service] if list == "serviceList" && service == "service")
}

fn set_device_field(device: &mut Device, field: &str, text: &str) {
    let value = text.to_string();
    match field {
        "deviceType" => device.device_type = value,
        "friendlyName" => device.friendly_name = value,
        "manufacturer" => device.manufacturer = value,
        "manufacturerURL" => device.manufacturer_url = value,
        "modelDescription" => device.model_description = value,
        "modelName" => device.model_name = value,
        "modelNumber" => device.model_number = value,
        _ => {}
    }
}

fn set_service_field(service: &mut ServiceDescriptor, field: &str, text: &str) {
    let value = text.to_string();
    match field {
        "serviceType" => service.service_type = value,
        "serviceId" => service.service_id = value,
        "SCPDURL" => service.scpd_url = value,
        "controlURL" => service.control_url = value,
        _ => {}
    }
}
