use std::path::Path;
use std::process;

use srcpath_core::Syntax;

use crate::units::{read_units, to_pretty_json, write_units};
use crate::{report_error, report_resolve_error, OutputFormat};

pub(crate) fn cmd_resolve(
    units_path: &Path,
    in_place: bool,
    syntax: &Syntax,
    output: OutputFormat,
    quiet: bool,
) {
    let mut units = match read_units(units_path) {
        Ok(u) => u,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let report = match srcpath_core::resolve_all(&mut units, syntax) {
        Ok(r) => r,
        Err(e) => {
            report_resolve_error(&e, output, quiet);
            process::exit(1);
        }
    };

    if !in_place {
        println!("{}", to_pretty_json(&units));
        return;
    }

    if let Err(msg) = write_units(units_path, &units) {
        report_error(&msg, output, quiet);
        process::exit(1);
    }

    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => {
            println!(
                "resolved {} unit(s), {} changed",
                report.order.len(),
                report.changed.len()
            );
            for name in &report.changed {
                println!("  ~ {}", name);
            }
        }
        OutputFormat::Json => {
            let pretty = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
    }
}
