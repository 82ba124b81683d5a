//! `history` commands: list, re-export, and clear archived manifests.

use std::path::PathBuf;

use crate::config::Settings;
use crate::export;
use crate::storage::{ArchiveStore, JsonArchiveStore, JsonSessionStore, WorkingSessionStore};

pub fn cmd_history_list(settings: &Settings) -> anyhow::Result<()> {
    let archive = JsonArchiveStore::new(&settings.data_dir);
    let manifests = archive.list()?;

    if manifests.is_empty() {
        println!("No finalized sessions yet.");
        return Ok(());
    }

    for manifest in &manifests {
        println!(
            "{} | {} - {} | {} units ({} warned) | operator {}",
            manifest.id,
            manifest.start_time.format("%Y-%m-%d %H:%M"),
            manifest.end_time.format("%H:%M"),
            manifest.items.len(),
            manifest.warned_count(),
            manifest.operator_name
        );
    }
    Ok(())
}

pub fn cmd_history_export(
    settings: &Settings,
    session_id: &str,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let archive = JsonArchiveStore::new(&settings.data_dir);
    let manifests = archive.list()?;
    let manifest = manifests
        .iter()
        .find(|m| m.id == session_id)
        .ok_or_else(|| anyhow::anyhow!("no archived session with id {}", session_id))?;

    let export_dir = out.unwrap_or_else(|| settings.export_dir.clone());
    let path = export::export_to_dir(manifest, &export_dir)?;
    println!("Manifest written to {}", path.display());
    Ok(())
}

pub fn cmd_history_clear(settings: &Settings, confirm: bool) -> anyhow::Result<()> {
    if !confirm {
        anyhow::bail!("This permanently deletes scan history. Re-run with --confirm.");
    }
    let archive = JsonArchiveStore::new(&settings.data_dir);
    let session = JsonSessionStore::new(&settings.data_dir);
    archive.clear()?;
    session.clear()?;
    println!("Cleared archived manifests and the working session snapshot.");
    Ok(())
}
