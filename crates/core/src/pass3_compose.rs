//! Pass 3: Composition -- build each unit's expanded source path bottom-up
//! in resolution order, inlining every followed unit between markers.

use crate::error::ResolveError;
use crate::pass1_parse::{ParsedScript, Part, UnitId};
use crate::pass2_graph::ResolutionOrder;
use crate::syntax::Syntax;

/// Memoized expansions, one slot per unit id.
pub struct Composer<'s> {
    syntax: &'s Syntax,
    expansions: Vec<Option<String>>,
}

impl<'s> Composer<'s> {
    pub fn new(syntax: &'s Syntax, units: usize) -> Self {
        Composer {
            syntax,
            expansions: vec![None; units],
        }
    }

    /// Expand every unit in `order`. `sources[i]` and `scripts[i]` are the
    /// original text and parse of unit `i`.
    pub fn compose_all(
        mut self,
        order: &ResolutionOrder,
        sources: &[&str],
        scripts: &[ParsedScript],
        names: &[&str],
    ) -> Result<Vec<String>, ResolveError> {
        for node in order.iter() {
            self.expand(node, sources[node], &scripts[node], names)?;
        }
        Ok(self
            .expansions
            .into_iter()
            .enumerate()
            .map(|(i, e)| e.unwrap_or_else(|| sources[i].to_string()))
            .collect())
    }

    /// Compute and cache the expansion of `node`. Every unit it follows must
    /// already be expanded.
    pub fn expand(
        &mut self,
        node: UnitId,
        source: &str,
        script: &ParsedScript,
        names: &[&str],
    ) -> Result<&str, ResolveError> {
        if self.expansions[node].is_none() {
            let text = if script.has_references() {
                self.splice(node, script, names)?
            } else {
                source.to_string()
            };
            self.expansions[node] = Some(text);
        }
        Ok(self.expansions[node].as_deref().unwrap_or_default())
    }

    pub fn expansion(&self, node: UnitId) -> Option<&str> {
        self.expansions.get(node).and_then(|e| e.as_deref())
    }

    fn splice(
        &self,
        node: UnitId,
        script: &ParsedScript,
        names: &[&str],
    ) -> Result<String, ResolveError> {
        let mut out = String::new();
        for part in &script.parts {
            let Some(target) = part.reference() else {
                out.push_str(part.text());
                continue;
            };
            let inner = self
                .expansion(target)
                .ok_or_else(|| ResolveError::OrderViolation {
                    entity: names[node].to_string(),
                    dependency: names[target].to_string(),
                })?;
            push_line(&mut out, part.directive_line());
            push_line(&mut out, &self.syntax.open_line(names[target]));
            push_line(&mut out, inner);
            push_line(&mut out, &self.syntax.close_marker);
        }
        Ok(out)
    }
}

/// Append `text`, terminating it with a newline if it has none. Empty text
/// adds nothing.
fn push_line(out: &mut String, text: &str) {
    out.push_str(text);
    if !text.is_empty() && !text.ends_with('\n') {
        out.push('\n');
    }
}
