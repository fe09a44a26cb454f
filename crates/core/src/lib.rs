//! srcpath-core: follow-directive resolution for equipment unit source paths.
//!
//! A unit's source path is plain text in which a directive line such as
//! `follow Truck 12` means "inline Truck 12's fully resolved source path
//! here". Resolution runs as a three-pass pipeline:
//!
//! 1. [`pass1_parse`] -- split each source path into literal and reference parts
//! 2. [`pass2_graph`] -- build the follow graph, reject cycles, compute the
//!    least-reference order
//! 3. [`pass3_compose`] -- expand bottom-up, wrapping inlined text in markers
//!
//! and [`resolve_all()`] writes the results back only when every pass succeeds.
//!
//! # Public API
//!
//! - [`resolve_all()`] / [`resolve_all_default()`] -- full resolution in place
//! - [`plan()`] -- parse, cycle-check and order without modifying anything
//! - [`SourcePathHolder`] -- the trait a host's unit type implements
//! - [`Unit`] -- a serde-backed unit record
//! - [`Syntax`] -- directive tokens and inlined-block markers
//! - [`ResolveError`] -- resolution error type

pub mod cursor;
pub mod error;
pub mod pass1_parse;
pub mod pass2_graph;
pub mod pass3_compose;
pub mod resolve;
pub mod syntax;
pub mod unit;

// ── Convenience re-exports: key types ────────────────────────────────

pub use cursor::LineCursor;
pub use error::ResolveError;
pub use pass1_parse::{Follow, ParsedScript, Part, UnitId};
pub use pass2_graph::{DependencyGraph, ResolutionOrder};
pub use resolve::{ResolutionPlan, ResolveReport};
pub use syntax::Syntax;
pub use unit::{SourcePathHolder, Unit};

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use pass1_parse::parse_script;
pub use resolve::{plan, resolve_all, resolve_all_default};
