use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::BakedLevel;

/// Render a baked level as pretty-printed JSON
///
/// Non-finite coordinates are rejected instead of silently becoming `null`.
pub fn level_to_json(level: &BakedLevel) -> Result<String> {
    for layer in &level.layers {
        if let Some(object) = layer.objects.iter().find(|o| !o.geometry.is_finite()) {
            bail!("Object '{}' has non-finite coordinates", object.id);
        }
    }
    serde_json::to_string_pretty(level).context("Failed to serialize level")
}

/// Write a baked level to a JSON file
pub fn write_json(path: &Path, level: &BakedLevel) -> Result<()> {
    let json = level_to_json(level)?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create level file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(())
}
