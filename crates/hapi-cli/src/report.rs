/*
[INPUT]:  Device trees from voxel.devices.list
[OUTPUT]: Filtered, fixed-width device table rows
[POS]:    Presentation layer - device listing formatting
[UPDATE]: When table columns or filter semantics change
*/

use hapi_client::{Node, Tree};

/// Table columns and their widths
pub const COLUMNS: [(&str, usize); 5] = [
    ("id", 6),
    ("label", 25),
    ("type", 15),
    ("model", 22),
    ("status", 10),
];

/// Model name that supports voxel.voxcloud.status
pub const VOXCLOUD_MODEL: &str = "VoxCLOUD";

/// Text of a device field, looking through `<field id=..>text</field>` wrappers
pub fn field_text<'a>(device: &'a Tree, key: &str) -> &'a str {
    match device.get(key) {
        Some(Node::Tree(inner)) => inner["text"].text(),
        Some(node) => node.text(),
        None => "",
    }
}

/// Host part of a label: everything before the first dot
pub fn short_label(label: &str) -> &str {
    match label.find('.') {
        Some(dot) if dot > 0 => &label[..dot],
        _ => label,
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_uppercase().contains(&needle.to_uppercase())
}

/// Case-insensitive substring filters for the device listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceFilter {
    pub device_type: Option<String>,
    pub model: Option<String>,
    pub host: Option<String>,
}

impl DeviceFilter {
    pub fn matches(&self, device: &Tree) -> bool {
        let checks = [
            (&self.model, field_text(device, "model")),
            (&self.device_type, field_text(device, "type")),
            (&self.host, device["label"].text()),
        ];
        checks.iter().all(|(wanted, actual)| match wanted {
            Some(needle) => contains_ignore_case(actual, needle),
            None => true,
        })
    }
}

/// One printed line of the device table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceRow {
    pub id: Option<String>,
    pub label: Option<String>,
    pub device_type: Option<String>,
    pub model: Option<String>,
    pub status: Option<String>,
}

impl DeviceRow {
    pub fn from_device(device: &Tree) -> Self {
        let present = |key: &str| {
            device
                .contains_key(key)
                .then(|| field_text(device, key).to_string())
        };
        Self {
            id: present("id"),
            label: present("label").map(|label| short_label(&label).to_string()),
            device_type: present("type"),
            model: present("model"),
            status: present("status"),
        }
    }

    pub fn render(&self) -> String {
        let cells = [
            &self.id,
            &self.label,
            &self.device_type,
            &self.model,
            &self.status,
        ];
        render_cells(cells.iter().map(|cell| cell.as_deref().unwrap_or("")))
    }
}

/// Upper-cased column titles
pub fn header_row() -> String {
    let titles: Vec<String> = COLUMNS.iter().map(|(name, _)| name.to_uppercase()).collect();
    render_cells(titles.iter().map(String::as_str))
}

fn render_cells<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    let line: Vec<String> = cells
        .zip(COLUMNS.iter())
        .map(|(value, &(_, width))| format!("{value:<width$}"))
        .collect();
    line.join(" ").trim_end().to_string()
}
