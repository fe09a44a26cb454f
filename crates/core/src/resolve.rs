//! Resolution driver: parse -> cycle check -> order -> compose -> write back.
//!
//! This is a thin orchestrator over the pass modules. Units are only
//! written after every pass has succeeded, so a failed resolution leaves
//! every source path exactly as it was.

use crate::error::ResolveError;
use crate::pass1_parse::{self, NamePool, ParsedScript, UnitId};
use crate::pass2_graph::{DependencyGraph, ResolutionOrder};
use crate::pass3_compose::Composer;
use crate::syntax::Syntax;
use crate::unit::SourcePathHolder;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Everything computed for a set of units short of composing them.
pub struct ResolutionPlan {
    /// Indices (into the caller's slice) of the active units; unit id `i`
    /// is `active[i]`.
    pub active: Vec<usize>,
    pub names: Vec<String>,
    pub scripts: Vec<ParsedScript>,
    pub graph: DependencyGraph,
    pub order: ResolutionOrder,
    /// The normalized syntax the scripts were parsed with.
    pub syntax: Syntax,
}

impl ResolutionPlan {
    /// Unit names in resolution order.
    pub fn ordered_names(&self) -> Vec<String> {
        self.order.iter().map(|id| self.names[id].clone()).collect()
    }

    /// For each unit, the distinct names it follows, in first-mention order.
    pub fn follows_by_name(&self) -> BTreeMap<String, Vec<String>> {
        self.scripts
            .iter()
            .enumerate()
            .map(|(id, script)| {
                let mut targets: Vec<String> = Vec::new();
                for f in &script.follows {
                    let name = &self.names[f.target];
                    if !targets.contains(name) {
                        targets.push(name.clone());
                    }
                }
                (self.names[id].clone(), targets)
            })
            .collect()
    }
}

/// Summary of a successful resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveReport {
    /// Active unit names in the order they were composed.
    pub order: Vec<String>,
    /// Distinct follow targets per active unit.
    pub follows: BTreeMap<String, Vec<String>>,
    /// Units whose source path text changed.
    pub changed: Vec<String>,
}

/// Parse, validate and order the active units without modifying them.
pub fn plan<E: SourcePathHolder>(
    units: &[E],
    syntax: &Syntax,
) -> Result<ResolutionPlan, ResolveError> {
    let syntax = syntax.clone().normalized()?;
    let active: Vec<usize> = units
        .iter()
        .enumerate()
        .filter(|(_, u)| u.is_active())
        .map(|(i, _)| i)
        .collect();
    let names: Vec<&str> = active.iter().map(|&i| units[i].name()).collect();

    let mut pool: NamePool = HashMap::with_capacity(names.len());
    for (id, name) in names.iter().enumerate() {
        if pool.insert(*name, id).is_some() {
            return Err(ResolveError::DuplicateName {
                name: name.to_string(),
            });
        }
    }

    // Pass 1: directive parsing
    let scripts = active
        .iter()
        .map(|&i| pass1_parse::parse_script(units[i].source_path(), &pool, &syntax))
        .collect::<Result<Vec<ParsedScript>, ResolveError>>()?;
    debug!(
        units = scripts.len(),
        follows = scripts.iter().map(|s| s.follows.len()).sum::<usize>(),
        "parsed source paths"
    );

    // Pass 2: graph, cycle check, ordering
    let graph = DependencyGraph::build(&scripts);
    graph.check_acyclic(&names)?;
    let order = graph.resolution_order();

    Ok(ResolutionPlan {
        names: names.iter().map(|n| n.to_string()).collect(),
        active,
        scripts,
        graph,
        order,
        syntax,
    })
}

/// Resolve every active unit's source path in place.
///
/// On error, no unit is modified.
pub fn resolve_all<E: SourcePathHolder>(
    units: &mut [E],
    syntax: &Syntax,
) -> Result<ResolveReport, ResolveError> {
    let plan = plan(units, syntax)?;

    // Pass 3: composition
    let sources: Vec<&str> = plan.active.iter().map(|&i| units[i].source_path()).collect();
    let names: Vec<&str> = plan.names.iter().map(String::as_str).collect();
    let expansions = Composer::new(&plan.syntax, plan.active.len()).compose_all(
        &plan.order,
        &sources,
        &plan.scripts,
        &names,
    )?;

    let changed: Vec<UnitId> = expansions
        .iter()
        .enumerate()
        .filter(|(id, text)| sources[*id] != text.as_str())
        .map(|(id, _)| id)
        .collect();

    let report = ResolveReport {
        order: plan.ordered_names(),
        follows: plan.follows_by_name(),
        changed: changed.iter().map(|&id| plan.names[id].clone()).collect(),
    };

    // Write back: the only mutation of the pass.
    for (id, text) in expansions.into_iter().enumerate() {
        units[plan.active[id]].set_source_path(text);
    }

    info!(
        units = plan.active.len(),
        changed = report.changed.len(),
        "resolved follow directives"
    );
    Ok(report)
}

/// [`resolve_all`] with the default directive syntax.
pub fn resolve_all_default<E: SourcePathHolder>(
    units: &mut [E],
) -> Result<ResolveReport, ResolveError> {
    resolve_all(units, &Syntax::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::Unit;

    #[test]
    fn plan_orders_dependencies_first() {
        let units = vec![
            Unit::new("Loader", "follow Truck\n"),
            Unit::new("Truck", "haul\n"),
        ];
        let plan = plan(&units, &Syntax::default().normalized().unwrap()).unwrap();
        assert_eq!(plan.ordered_names(), vec!["Truck", "Loader"]);
        assert_eq!(plan.follows_by_name()["Loader"], vec!["Truck"]);
        assert!(plan.follows_by_name()["Truck"].is_empty());
    }

    #[test]
    fn plan_skips_inactive_units() {
        let units = vec![
            Unit::new("A", "follow B\n"),
            Unit::new("B", "x\n").inactive(),
        ];
        let plan = plan(&units, &Syntax::default().normalized().unwrap()).unwrap();
        assert_eq!(plan.active, vec![0]);
        assert!(plan.scripts[0].follows.is_empty());
    }

    #[test]
    fn plan_normalizes_custom_syntax() {
        let units = vec![Unit::new("A", "follow B\n"), Unit::new("B", "b\n")];
        let syntax = Syntax {
            tokens: vec!["FOLLOW".into()],
            open_marker: "  #>> follow ".into(),
            ..Syntax::default()
        };
        let plan = plan(&units, &syntax).unwrap();
        assert_eq!(plan.follows_by_name()["A"], vec!["B"]);
        assert_eq!(plan.syntax.tokens, vec!["follow"]);

        let mut resolved = units.clone();
        let report = resolve_all(&mut resolved, &syntax).unwrap();
        assert_eq!(report.follows, plan.follows_by_name());
    }

    #[test]
    fn plan_handles_long_follow_chain() {
        // unit i follows unit i - 1
        let units: Vec<Unit> = (0..10_000)
            .map(|i| {
                let text = if i == 0 {
                    "dig\n".to_string()
                } else {
                    format!("follow u{}\n", i - 1)
                };
                Unit::new(format!("u{}", i), text)
            })
            .collect();
        let plan = plan(&units, &Syntax::default()).unwrap();
        assert_eq!(plan.ordered_names().first().map(String::as_str), Some("u0"));
        assert_eq!(plan.ordered_names().last().map(String::as_str), Some("u9999"));
    }

    #[test]
    fn plan_rejects_invalid_syntax() {
        let units = vec![Unit::new("A", "a\n")];
        let syntax = Syntax {
            close_marker: "".into(),
            ..Syntax::default()
        };
        assert!(matches!(
            plan(&units, &syntax),
            Err(ResolveError::InvalidSyntax { .. })
        ));
    }

    #[test]
    fn duplicate_active_names_rejected() {
        let mut units = vec![Unit::new("A", "1\n"), Unit::new("A", "2\n")];
        let err = resolve_all_default(&mut units).unwrap_err();
        assert_eq!(err, ResolveError::DuplicateName { name: "A".into() });
        assert_eq!(units[0].source_path, "1\n");
    }

    #[test]
    fn duplicate_name_allowed_when_one_is_inactive() {
        let mut units = vec![
            Unit::new("A", "1\n"),
            Unit::new("A", "2\n").inactive(),
        ];
        resolve_all_default(&mut units).unwrap();
    }

    #[test]
    fn invalid_syntax_rejected_before_parsing() {
        let mut units = vec![Unit::new("A", "follow A\n")];
        let syntax = Syntax {
            tokens: vec![],
            ..Syntax::default()
        };
        let err = resolve_all(&mut units, &syntax).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidSyntax { .. }));
    }

    #[test]
    fn report_lists_changed_units() {
        let mut units = vec![Unit::new("A", "follow B\n"), Unit::new("B", "b\n")];
        let report = resolve_all_default(&mut units).unwrap();
        assert_eq!(report.order, vec!["B", "A"]);
        assert_eq!(report.changed, vec!["A"]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["follows"]["A"], serde_json::json!(["B"]));
    }
}
