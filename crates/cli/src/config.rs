//! Directive syntax configuration for `srcpath --config`.
//!
//! Every key is optional; missing keys fall back to the built-in syntax.
//!
//! # Example
//!
//! ```toml
//! tokens = ["follows", "follow", "flw"]
//! open_marker = "#>> follow "
//! close_marker = "#<< follow"
//! ```

use std::path::Path;

use srcpath_core::Syntax;

/// Load and validate the syntax from `path`, or the default syntax when no
/// path is given. Returns a human-readable error string on failure.
pub(crate) fn load_syntax(path: Option<&Path>) -> Result<Syntax, String> {
    let syntax = match path {
        Some(path) => read_syntax(path)?,
        None => Syntax::default(),
    };
    syntax.normalized().map_err(|e| e.to_string())
}

fn read_syntax(path: &Path) -> Result<Syntax, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}
