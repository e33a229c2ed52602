use std::{fs, path::Path};

use anyhow::Context;

use crate::work::WorkRecord;

/// Write `records` as an indented JSON array, replacing whatever was at `path`.
///
/// Missing parent directories are created. Returns the number of records written.
pub fn write_output(path: &Path, records: &[WorkRecord]) -> anyhow::Result<usize> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }

    let mut json = serde_json::to_string_pretty(records).context("failed to serialise records")?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;

    Ok(records.len())
}
