use std::path::Path;
use std::process;

use srcpath_core::Syntax;

use crate::units::read_units;
use crate::{report_error, report_resolve_error, OutputFormat};

pub(crate) fn cmd_check(units_path: &Path, syntax: &Syntax, output: OutputFormat, quiet: bool) {
    let units = match read_units(units_path) {
        Ok(u) => u,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let plan = match srcpath_core::plan(&units, syntax) {
        Ok(p) => p,
        Err(e) => {
            report_resolve_error(&e, output, quiet);
            process::exit(1);
        }
    };

    if quiet {
        return;
    }
    let order = plan.ordered_names();
    let follows = plan.follows_by_name();
    match output {
        OutputFormat::Text => {
            println!("ok: {} active unit(s), no circular follows", order.len());
            for (i, name) in order.iter().enumerate() {
                match follows.get(name).filter(|targets| !targets.is_empty()) {
                    Some(targets) => println!("{:>4}. {} <- {}", i + 1, name, targets.join(", ")),
                    None => println!("{:>4}. {}", i + 1, name),
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "valid": true,
                "order": order,
                "follows": follows,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
    }
}
