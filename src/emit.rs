use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::EmitError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmitPaths {
    pub md_path: String,
    pub meta_path: String,
    #[serde(default)]
    pub portal_path: Option<String>,
}

fn write_err(e: impl std::fmt::Display) -> EmitError {
    EmitError::WriteFailed(e.to_string())
}

/// Write to a pid-suffixed sibling, then rename into place.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), EmitError> {
    let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    let tmp: PathBuf = path.with_file_name(format!("{}.tmp.{}", name, std::process::id()));
    std::fs::write(&tmp, bytes).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(write_err)
}

/// Emit `<stem>.md`, `<stem>.meta.json` and, when given, `<stem>.portal.txt` into `outdir`.
pub fn emit_document(
    markdown: &str,
    meta: &serde_json::Value,
    portal_text: Option<&str>,
    outdir: &Path,
    stem: &str,
) -> Result<EmitPaths, EmitError> {
    std::fs::create_dir_all(outdir).map_err(write_err)?;
    let md_path = outdir.join(format!("{}.md", stem));
    let meta_path = outdir.join(format!("{}.meta.json", stem));

    write_atomic(&md_path, markdown.as_bytes())?;
    let meta_bytes = serde_json::to_vec_pretty(meta).map_err(write_err)?;
    write_atomic(&meta_path, &meta_bytes)?;

    let portal_path = match portal_text {
        Some(text) => {
            let p = outdir.join(format!("{}.portal.txt", stem));
            write_atomic(&p, text.as_bytes())?;
            Some(p.to_string_lossy().to_string())
        }
        None => None,
    };

    Ok(EmitPaths {
        md_path: md_path.to_string_lossy().to_string(),
        meta_path: meta_path.to_string_lossy().to_string(),
        portal_path,
    })
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().iter().map(|b| format!("{:02x}", b)).collect()
}
