//! Background Removal Client CLI
//!
//! Uploads an image to a background removal service, requests the removal and
//! saves the transparent result.

#[cfg(feature = "cli")]
use bgremove_client::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Please rebuild with --features cli");
    std::process::exit(1);
}
