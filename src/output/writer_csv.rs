use csv::Writer;
use std::fs::File;
use std::path::Path;

use crate::probe::ProbeResult;

pub fn write_csv(path: &Path, items: &[ProbeResult]) -> anyhow::Result<()> {
    let f = File::create(path)?;
    let mut w = Writer::from_writer(f);
    w.write_record(["site", "url", "outcome", "status", "error_kind", "error_detail", "elapsed_ms"])?;
    for it in items {
        w.write_record(&[
            it.site.clone(),
            it.url.clone(),
            it.outcome.label().to_string(),
            it.status.map(|v| v.to_string()).unwrap_or_default(),
            it.error_kind.map(|k| format!("{:?}", k).to_lowercase()).unwrap_or_default(),
            it.error_detail.clone().unwrap_or_default(),
            it.elapsed_ms.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
