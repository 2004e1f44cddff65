//! Status command implementation

use crate::config::Config;
use crate::error::Result;
use crate::index::{read_manifest, IndexManifest};
use serde::Serialize;

/// Status of the persisted index
#[derive(Debug, Clone, Serialize)]
pub struct StatusInfo {
    pub data_dir: String,
    pub index_present: bool,
    pub manifest: Option<IndexManifest>,
}

/// Inspect the persisted index without loading it
pub fn cmd_status(config: &Config) -> Result<StatusInfo> {
    let manifest = match read_manifest(&config.index_dir()) {
        Ok(manifest) => Some(manifest),
        Err(_) => None,
    };

    Ok(StatusInfo {
        data_dir: config.data_dir.display().to_string(),
        index_present: manifest.is_some(),
        manifest,
    })
}

/// Print status for humans
pub fn print_status(status: &StatusInfo) {
    println!("Data directory: {}", status.data_dir);

    match &status.manifest {
        Some(manifest) => {
            println!("Index: present");
            println!("  chunks:    {}", manifest.chunk_count);
            println!("  embedder:  {}", manifest.embedder_id);
            println!("  dimension: {}", manifest.dimension);
            println!("  built at:  {}", manifest.built_at.to_rfc3339());
        }
        None => println!("Index: not built yet (run 'docent ingest')"),
    }
}
