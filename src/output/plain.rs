use std::fmt::Write;

use colored::Colorize;

use super::{OutputError, OutputOptions, RenderedResult};

const SEPARATOR: &str = ": ";

/// Human-readable listing: one block per interface, implementer positions
/// padded so names line up across the whole output.
pub(super) fn render(results: &[RenderedResult], options: &OutputOptions) -> Result<String, OutputError> {
    let width = results
        .iter()
        .flat_map(|r| &r.implementers)
        .map(|i| i.pos.short().len() + SEPARATOR.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (index, result) in results.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let name = if options.color {
            result.interface.name.green().bold().to_string()
        } else {
            result.interface.name.clone()
        };
        writeln!(out, "{}{}{}", name, SEPARATOR, result.interface.pos)?;

        if result.implementers.is_empty() {
            writeln!(out, "No implementing types.")?;
            continue;
        }
        for implementer in &result.implementers {
            let position = format!("{}{}", implementer.pos.short(), SEPARATOR);
            let name = if options.color {
                implementer.name.yellow().to_string()
            } else {
                implementer.name.clone()
            };
            writeln!(out, "{:<width$}{}", position, name)?;
        }
    }
    Ok(out)
}
