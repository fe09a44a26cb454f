/// All errors that can abort a resolution pass.
///
/// Recoverable parsing anomalies (unterminated inlined blocks, directives
/// naming an unknown unit) are absorbed by the parser and never surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The follow graph among active units contains a cycle. `cycle` lists the
    /// unit names along the offending path, ending with the repeated unit.
    #[error("circular follow reference detected: {}", cycle.join(" \u{2192} "))]
    CircularDependency { cycle: Vec<String> },

    /// Two active units share a name, so directives naming it are ambiguous.
    #[error("duplicate unit name '{name}'")]
    DuplicateName { name: String },

    /// A line cursor was asked to seek beyond the content it can read.
    #[error("line cursor seek out of range: position {requested}, {available} line(s) available")]
    SeekOutOfRange { requested: usize, available: usize },

    /// The directive syntax configuration is unusable.
    #[error("invalid directive syntax: {reason}")]
    InvalidSyntax { reason: String },

    /// A unit was composed before one of the units it follows.
    #[error("unit '{entity}' composed before its dependency '{dependency}'")]
    OrderViolation { entity: String, dependency: String },
}

impl ResolveError {
    /// Stable machine-readable kind, used in JSON error output.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::CircularDependency { .. } => "circular_dependency",
            ResolveError::DuplicateName { .. } => "duplicate_name",
            ResolveError::SeekOutOfRange { .. } => "seek_out_of_range",
            ResolveError::InvalidSyntax { .. } => "invalid_syntax",
            ResolveError::OrderViolation { .. } => "order_violation",
        }
    }

    /// Serialize to the JSON shape the CLI reports on stderr.
    pub fn to_json_value(&self) -> serde_json::Value {
        let mut value = serde_json::json!({
            "kind":    self.kind(),
            "message": self.to_string(),
        });
        if let ResolveError::CircularDependency { cycle } = self {
            value["cycle"] = serde_json::json!(cycle);
        }
        value
    }
}
