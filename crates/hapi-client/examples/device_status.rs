/*
[INPUT]:  hAPI key/secret from the environment and device labels from argv
[OUTPUT]: Provisioning status per device printed to stdout
[POS]:    Examples - label lookup plus a signed status call
[UPDATE]: When the call builder or lookup API changes
*/

use hapi_client::{Client, ClientConfig, Credentials};

/// Example: resolve labels and print their VoxCLOUD status
///
/// HAPI_KEY=... HAPI_SECRET=... cargo run --example device_status -- web1 web2
#[tokio::main]
async fn main() {
    let (Ok(key), Ok(secret)) = (std::env::var("HAPI_KEY"), std::env::var("HAPI_SECRET")) else {
        eprintln!("Set HAPI_KEY and HAPI_SECRET first");
        return;
    };

    let client = match Client::with_credentials(ClientConfig::default(), Credentials::new(key, secret)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };

    for label in std::env::args().skip(1) {
        let device_id = match client.id_from_label(&label).await {
            Ok(id) => id,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match client
            .method("voxel.voxcloud.status")
            .param("device_id", &device_id)
            .send_tree()
            .await
        {
            Ok(result) => println!(
                "Status for {}({}): {}",
                label, device_id, result["devices"]["device"]["status"]
            ),
            Err(e) => println!("{}", e),
        }
    }
}
