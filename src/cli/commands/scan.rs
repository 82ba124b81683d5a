//! `scan` command: extract label images into the working session.

use std::path::PathBuf;

use anyhow::Context;

use crate::config::Settings;
use crate::services::CaptureOutcome;

pub async fn cmd_scan(settings: &Settings, images: &[PathBuf]) -> anyhow::Result<()> {
    if images.is_empty() {
        anyhow::bail!("No images to scan. Pass one or more label image files.");
    }

    let service = super::build_scan_service(settings, settings.export_dir.clone());

    let mut logged = 0usize;
    let mut warned = 0usize;
    let mut skipped = 0usize;

    for path in images {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read image {}", path.display()))?;

        match service.capture(&bytes).await {
            CaptureOutcome::Logged(item) => {
                logged += 1;
                match &item.warning {
                    Some(warning) => {
                        warned += 1;
                        println!("[{}] LOGGED WITH WARNING - {}", item.id, warning);
                    }
                    None => println!("[{}] VERIFIED - {}", item.id, item.recipient_name),
                }
            }
            CaptureOutcome::Congestion => {
                skipped += 1;
                println!(
                    "Recognition service congested; {} skipped. Try again shortly.",
                    path.display()
                );
            }
            CaptureOutcome::ConfigError => {
                anyhow::bail!(
                    "Recognition API key is missing; set PINSORT_API_KEY before scanning."
                );
            }
            CaptureOutcome::Invalid => {
                skipped += 1;
                println!("Invalid or blurred label data in {}; re-capture.", path.display());
            }
            CaptureOutcome::Busy | CaptureOutcome::Paused => {
                skipped += 1;
                println!("Capture unavailable for {}; try again.", path.display());
            }
        }
    }

    let total = service.session_items().await.len();
    println!(
        "\nSession log: {} units ({} with routing warnings). Logged {} of {} images ({} skipped).",
        total,
        warned,
        logged,
        images.len(),
        skipped
    );
    Ok(())
}
