/*
[INPUT]:  Connected hAPI client, list filters or device labels
[OUTPUT]: Device table and per-label provisioning status on a writer
[POS]:    Command layer - `hapi list` and `hapi status` behavior
[UPDATE]: When command output or remote calls change
*/

use std::io::Write;

use anyhow::{Context, Result};
use hapi_client::{Client, Node};
use tracing::{debug, warn};

use crate::report::{field_text, header_row, DeviceFilter, DeviceRow, VOXCLOUD_MODEL};

/// Options for `hapi list`
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub filter: DeviceFilter,
    /// Fetch voxel.voxcloud.status for VoxCLOUD devices
    pub show_status: bool,
    /// Ask for extended output and dump each device tree
    pub verbose: bool,
}

/// Print the device table
pub async fn list_devices<W: Write>(client: &Client, options: &ListOptions, out: &mut W) -> Result<()> {
    writeln!(out, "{}", header_row())?;

    let verbosity = if options.verbose { "extended" } else { "normal" };
    let result = client
        .method("voxel.devices.list")
        .param("verbosity", verbosity)
        .send_tree()
        .await
        .context("list devices")?;

    let devices = result["devices"]["device"].items().filter_map(Node::as_tree);
    for device in devices {
        if !options.filter.matches(device) {
            continue;
        }

        let mut row = DeviceRow::from_device(device);
        if options.show_status && field_text(device, "model") == VOXCLOUD_MODEL {
            let device_id = device["id"].text();
            debug!(device_id, "fetching voxcloud status");
            let status = client
                .method("voxel.voxcloud.status")
                .param("device_id", device_id)
                .send_tree()
                .await
                .with_context(|| format!("voxcloud status for device {device_id}"))?;
            row.status = Some(status["devices"]["device"]["status"].text().to_string());
        }

        writeln!(out, "{}", row.render())?;
        if options.verbose {
            writeln!(out, "{device}")?;
        }
    }
    Ok(())
}

/// Print `Status for <label>(<id>): <status>` per label.
///
/// A failing label prints its error and the loop moves on; the number of
/// failed labels is returned.
pub async fn device_status<W: Write>(client: &Client, labels: &[String], out: &mut W) -> Result<usize> {
    let mut failures = 0;
    for label in labels {
        match status_line(client, label).await {
            Ok(line) => writeln!(out, "{line}")?,
            Err(err) => {
                warn!(%label, error = %err, "status lookup failed");
                failures += 1;
                writeln!(out, "{err}")?;
            }
        }
    }
    Ok(failures)
}

async fn status_line(client: &Client, label: &str) -> hapi_client::Result<String> {
    let device_id = client.id_from_label(label).await?;
    let result = client
        .method("voxel.voxcloud.status")
        .param("device_id", &device_id)
        .send_tree()
        .await?;
    Ok(format!(
        "Status for {label}({device_id}): {}",
        result["devices"]["device"]["status"]
    ))
}
