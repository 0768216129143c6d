use std::fs;
use std::path::Path;

pub fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Identifier reduced to characters safe for a file name.
pub fn file_stem(identifier: &str) -> String {
    let stem: String = identifier
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();
    if stem.trim_matches('.').is_empty() { "target".to_string() } else { stem }
}
