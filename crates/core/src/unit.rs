//! The seam between the resolver and the host's equipment units.
//!
//! The resolver only needs a unit's name, its active flag, and read/write
//! access to its source path. Hosts implement [`SourcePathHolder`] on their
//! own unit type; [`Unit`] is the serde-backed record used by the CLI and
//! in tests.

use serde::{Deserialize, Serialize};

/// A unit whose source path can be resolved.
pub trait SourcePathHolder {
    /// Stable unique name; directives reference units by this exact string.
    fn name(&self) -> &str;

    /// Inactive units are neither resolved nor resolvable as follow targets.
    fn is_active(&self) -> bool;

    fn source_path(&self) -> &str;

    /// Overwrite the source path with its resolved expansion.
    fn set_source_path(&mut self, text: String);
}

/// A plain equipment unit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub source_path: String,
}

fn default_active() -> bool {
    true
}

impl Unit {
    pub fn new(name: impl Into<String>, source_path: impl Into<String>) -> Self {
        Unit {
            name: name.into(),
            active: true,
            source_path: source_path.into(),
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

impl SourcePathHolder for Unit {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn source_path(&self) -> &str {
        &self.source_path
    }

    fn set_source_path(&mut self, text: String) {
        self.source_path = text;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_defaults_active_and_empty_path() {
        let u: Unit = serde_json::from_str(r#"{"name": "Shovel 1"}"#).unwrap();
        assert!(u.active);
        assert_eq!(u.source_path, "");
    }

    #[test]
    fn deserialize_inactive() {
        let u: Unit =
            serde_json::from_str(r#"{"name": "T1", "active": false, "source_path": "go\n"}"#)
                .unwrap();
        assert_eq!(u, Unit::new("T1", "go\n").inactive());
    }
}
