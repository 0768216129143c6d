use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::probe::ProbeResult;

/// Append one JSON object per probe result.
pub fn write_jsonl(path: &Path, items: &[ProbeResult]) -> anyhow::Result<()> {
    let mut f = OpenOptions::new().append(true).create(true).open(path)?;
    for it in items {
        let line = serde_json::to_string(it)?;
        f.write_all(line.as_bytes())?;
        f.write_all(b"\n")?;
    }
    Ok(())
}

pub fn read_jsonl(path: &Path) -> anyhow::Result<Vec<ProbeResult>> {
    let mut out = Vec::new();
    let data = std::fs::read_to_string(path)?;
    for line in data.lines() {
        if line.trim().is_empty() { continue; }
        out.push(serde_json::from_str(line)?);
    }
    Ok(out)
}
