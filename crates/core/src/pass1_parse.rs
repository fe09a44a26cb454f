//! Pass 1: Directive parsing -- split one unit's source path into literal
//! chunks and follow references, skipping any block a previous pass inlined.

use crate::cursor::LineCursor;
use crate::error::ResolveError;
use crate::syntax::Syntax;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Index of a unit within the active set of one resolution pass.
pub type UnitId = usize;

/// Name → unit lookup over the active set.
pub type NamePool<'a> = HashMap<&'a str, UnitId>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Text reproduced verbatim.
    Literal(String),
    /// A directive line, plus any blank lines and stale inlined block that
    /// followed it. The whole text is replaced on composition.
    Reference { target: UnitId, text: String },
}

impl Part {
    pub fn text(&self) -> &str {
        match self {
            Part::Literal(text) | Part::Reference { text, .. } => text,
        }
    }

    pub fn reference(&self) -> Option<UnitId> {
        match self {
            Part::Literal(_) => None,
            Part::Reference { target, .. } => Some(*target),
        }
    }

    /// The directive line of a reference part (the literal text otherwise),
    /// including its line terminator if it had one.
    pub fn directive_line(&self) -> &str {
        let text = self.text();
        text.split_inclusive('\n').next().unwrap_or(text)
    }
}

/// A single follow directive: which unit, and the 0-based line it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Follow {
    pub target: UnitId,
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedScript {
    pub parts: Vec<Part>,
    pub follows: Vec<Follow>,
}

impl ParsedScript {
    pub fn has_references(&self) -> bool {
        !self.follows.is_empty()
    }
}

/// Parse `text` against the candidate `pool`. Directives naming a unit that
/// is not in the pool are kept as literal text.
pub fn parse_script(
    text: &str,
    pool: &NamePool<'_>,
    syntax: &Syntax,
) -> Result<ParsedScript, ResolveError> {
    let mut cursor = LineCursor::new(text);
    let mut script = ParsedScript::default();

    while let Some(line) = cursor.peek_line() {
        match lookup_directive(line, pool, syntax) {
            Some((name, target)) => {
                script.follows.push(Follow {
                    target,
                    line: cursor.position(),
                });
                cursor.read_line();
                let text = read_reference(&mut cursor, line, name, syntax)?;
                script.parts.push(Part::Reference { target, text });
            }
            None => {
                let text = read_literal(&mut cursor, pool, syntax)?;
                script.parts.push(Part::Literal(text));
            }
        }
    }

    Ok(script)
}

fn lookup_directive<'l>(
    line: &'l str,
    pool: &NamePool<'_>,
    syntax: &Syntax,
) -> Option<(&'l str, UnitId)> {
    let name = syntax.directive_target(line)?;
    match pool.get(name) {
        Some(&id) => Some((name, id)),
        None => {
            debug!(target_name = name, "follow directive names unknown unit, kept literal");
            None
        }
    }
}

/// Accumulate lines up to (not including) the next recognized directive.
fn read_literal(
    cursor: &mut LineCursor<'_>,
    pool: &NamePool<'_>,
    syntax: &Syntax,
) -> Result<String, ResolveError> {
    let mut text = String::new();
    while let Some(line) = cursor.read_line() {
        if !text.is_empty() && lookup_directive(line, pool, syntax).is_some() {
            cursor.unread()?;
            break;
        }
        text.push_str(line);
    }
    Ok(text)
}

/// Consume whatever belongs to a directive already read: blank lines and a
/// block labeled with `name`, if one follows. Without such a block, the
/// cursor is rewound so those lines are read again as ordinary content.
fn read_reference(
    cursor: &mut LineCursor<'_>,
    directive: &str,
    name: &str,
    syntax: &Syntax,
) -> Result<String, ResolveError> {
    let mut text = directive.to_string();
    let resume = cursor.position();

    while let Some(line) = cursor.peek_line() {
        if !line.trim().is_empty() {
            break;
        }
        text.push_str(line);
        cursor.read_line();
    }

    match cursor.read_line() {
        Some(line) if syntax.is_open_for(line, name) => {
            text.push_str(line);
            skip_block(cursor, &mut text, name, syntax);
        }
        _ => {
            text.truncate(directive.len());
            cursor.set_position(resume)?;
        }
    }
    Ok(text)
}

/// Append lines up to and including the close marker matching an open
/// marker already consumed. Nested blocks are balanced by depth.
fn skip_block(cursor: &mut LineCursor<'_>, text: &mut String, name: &str, syntax: &Syntax) {
    let mut depth = 1usize;
    while let Some(line) = cursor.read_line() {
        text.push_str(line);
        if syntax.is_close(line) {
            depth -= 1;
            if depth == 0 {
                return;
            }
        } else if syntax.is_open(line) {
            depth += 1;
        }
    }
    warn!(
        target_name = name,
        depth, "inlined block never closed, treating end of source path as its end"
    );
}
