//! `status` and `finalize` commands.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::session::{SessionAggregator, SessionError};
use crate::storage::{ArchiveStore, JsonArchiveStore, JsonSessionStore};

pub fn cmd_status(settings: &Settings) -> anyhow::Result<()> {
    let aggregator =
        SessionAggregator::resume(Arc::new(JsonSessionStore::new(&settings.data_dir)));
    let archive = JsonArchiveStore::new(&settings.data_dir);

    if aggregator.is_empty() {
        println!("Working session: empty. Awaiting postal entry.");
    } else {
        println!(
            "Working session: {} units ({} with routing warnings)",
            aggregator.len(),
            aggregator.warned_count()
        );
        for item in aggregator.items() {
            let status = item.warning.as_deref().unwrap_or("VERIFIED");
            println!(
                "  [{}] {} | {} | {} | {}",
                item.id,
                item.timestamp.format("%Y-%m-%d %H:%M:%S"),
                item.recipient_name,
                item.address,
                status
            );
        }
    }

    let manifests = archive.list()?;
    let total_units: usize = manifests.iter().map(|m| m.items.len()).sum();
    println!(
        "Archive: {} finalized sessions, {} units total.",
        manifests.len(),
        total_units
    );
    Ok(())
}

pub async fn cmd_finalize(
    settings: &Settings,
    operator: Option<String>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let operator = match operator.or_else(|| settings.operator_name.clone()) {
        Some(name) => name,
        None => anyhow::bail!(
            "No operator name. Pass --operator or set PINSORT_OPERATOR."
        ),
    };

    let store = Arc::new(JsonSessionStore::new(&settings.data_dir));
    let archive = JsonArchiveStore::new(&settings.data_dir);
    let export_dir = out.unwrap_or_else(|| settings.export_dir.clone());
    let mut aggregator = SessionAggregator::resume(store);

    match aggregator.finalize(&operator, &export_dir, &archive) {
        Ok((manifest, path)) => {
            println!(
                "Finalized session {}: {} units ({} with routing warnings).",
                manifest.id,
                manifest.items.len(),
                manifest.warned_count()
            );
            println!("Manifest written to {}", path.display());
            Ok(())
        }
        Err(SessionError::EmptySession) => {
            anyhow::bail!("No data to finalize. Scan at least one item first.")
        }
        Err(err) => Err(err.into()),
    }
}
