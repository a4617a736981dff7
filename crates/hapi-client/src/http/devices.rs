/*
[INPUT]:  Human-readable device labels
[OUTPUT]: Remote device identifiers
[POS]:    HTTP layer - device lookup helpers built on voxel.devices.list
[UPDATE]: When label matching rules or the device listing shape change
*/

use crate::http::{Client, HapiError, Result};
use crate::types::{Node, Tree};

impl Client {
    /// Resolve a device label to its id
    ///
    /// GET ?method=voxel.devices.list
    /// Matches the label exactly or as the first dotted component of it.
    pub async fn id_from_label(&self, label: &str) -> Result<String> {
        let result = self.method("voxel.devices.list").send_tree().await?;
        find_device_id(&result, label).ok_or_else(|| HapiError::LabelNotFound {
            label: label.to_string(),
        })
    }
}

/// Whether a device label answers to the given short or full name
pub fn label_matches(device_label: &str, label: &str) -> bool {
    device_label == label
        || device_label
            .strip_prefix(label)
            .is_some_and(|rest| rest.starts_with('.'))
}

/// First device in a `voxel.devices.list` result whose label matches
pub fn find_device_id(result: &Tree, label: &str) -> Option<String> {
    result["devices"]["device"]
        .items()
        .filter_map(Node::as_tree)
        .find(|device| label_matches(device["label"].text(), label))
        .map(|device| device["id"].text().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_document;

    fn listing(xml: &str) -> Tree {
        Tree::from_xml(&parse_document(xml).expect("parse"))
    }

    #[test]
    fn test_label_matches() {
        assert!(label_matches("web1.example.com", "web1"));
        assert!(label_matches("web2", "web2"));
        assert!(!label_matches("web10.example.com", "web1"));
        assert!(!label_matches("web1", "web1.example.com"));
    }

    #[test]
    fn test_find_device_id() {
        let result = listing(
            r#"<rsp stat="ok"><devices>
                <device id="1" label="web1.example.com"/>
                <device id="2" label="web2"/>
            </devices></rsp>"#,
        );

        assert_eq!(find_device_id(&result, "web1").as_deref(), Some("1"));
        assert_eq!(find_device_id(&result, "web2").as_deref(), Some("2"));
        assert_eq!(find_device_id(&result, "missing"), None);
    }

    #[test]
    fn test_find_device_id_single_device() {
        let result = listing(r#"<rsp stat="ok"><devices><device id="9" label="db"/></devices></rsp>"#);
        assert_eq!(find_device_id(&result, "db").as_deref(), Some("9"));
    }

    #[test]
    fn test_find_device_id_empty_listing() {
        let result = listing(r#"<rsp stat="ok"><devices/></rsp>"#);
        assert_eq!(find_device_id(&result, "db"), None);
    }
}
