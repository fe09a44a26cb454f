//! Reading and writing the JSON unit file.
//!
//! The file is a JSON array of units:
//!
//! ```json
//! [
//!   { "name": "Shovel 1", "active": true, "source_path": "dig\nfollow Truck 4\n" },
//!   { "name": "Truck 4", "source_path": "haul to crusher\n" }
//! ]
//! ```

use std::path::Path;

use srcpath_core::Unit;

pub(crate) fn read_units(path: &Path) -> Result<Vec<Unit>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("error reading file '{}': {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("error parsing JSON in '{}': {}", path.display(), e))
}

pub(crate) fn to_pretty_json(units: &[Unit]) -> String {
    serde_json::to_string_pretty(units).unwrap_or_else(|e| format!("serialization error: {}", e))
}

pub(crate) fn write_units(path: &Path, units: &[Unit]) -> Result<(), String> {
    let mut json = to_pretty_json(units);
    json.push('\n');
    std::fs::write(path, json).map_err(|e| format!("error writing file '{}': {}", path.display(), e))
}
