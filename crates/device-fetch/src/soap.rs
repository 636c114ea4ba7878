//! SOAP envelopes for the ContentDirectory Browse action

/// Browse flag asking for the direct children of a container
pub const BROWSE_DIRECT_CHILDREN: &str = "BrowseDirectChildren";

/// Build the Browse request envelope for `object_id`
///
/// Wildcard property filter, starting index 0 and no sort criteria.
pub fn browse_envelope(service_type: &str, object_id: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8" standalone="yes"?>
<s:Envelope s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/" xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Body>
    <u:Browse xmlns:u="{}">
      <ObjectID>{}</ObjectID>
      <BrowseFlag>{}</BrowseFlag>
      <Filter>*</Filter>
      <StartingIndex>0</StartingIndex>
      <SortCriteria></SortCriteria>
    </u:Browse>
  </s:Body>
</s:Envelope>"#,
        escape_xml(service_type),
        escape_xml(object_id),
        BROWSE_DIRECT_CHILDREN
    )
}

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
