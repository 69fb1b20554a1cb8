//! CPLEX LP text export of a built model

use super::model::{BipModel, Comparison, LinearExpr, Sense, VariableDomain};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Write `model` in CPLEX LP format
pub fn write_lp<W: Write>(model: &BipModel, out: &mut W) -> Result<()> {
    writeln!(out, "\\ Model {}", model.name())?;

    let sense = match model.objective().map(|o| o.sense) {
        Some(Sense::Maximize) => "Maximize",
        _ => "Minimize",
    };
    writeln!(out, "{}", sense)?;
    let objective = model.objective().map(|o| o.expr.clone()).unwrap_or_default();
    writeln!(out, " obj: {}", format_expr(model, &objective))?;

    writeln!(out, "Subject To")?;
    for constraint in model.constraints() {
        let op = match constraint.comparison {
            Comparison::LessEqual => "<=",
            Comparison::Equal => "=",
            Comparison::GreaterEqual => ">=",
        };
        writeln!(
            out,
            " {}: {} {} {}",
            constraint.name,
            format_expr(model, &constraint.expr),
            op,
            format_number(constraint.rhs)
        )?;
    }

    let bounded: Vec<_> = model
        .variables()
        .iter()
        .filter(|v| v.domain != VariableDomain::Binary)
        .collect();
    if !bounded.is_empty() {
        writeln!(out, "Bounds")?;
        for var in &bounded {
            if var.upper_bound.is_finite() {
                writeln!(
                    out,
                    " {} <= {} <= {}",
                    format_number(var.lower_bound),
                    var.name,
                    format_number(var.upper_bound)
                )?;
            } else {
                writeln!(out, " {} >= {}", var.name, format_number(var.lower_bound))?;
            }
        }
    }

    write_section(out, "General", model, VariableDomain::Integer)?;
    write_section(out, "Binary", model, VariableDomain::Binary)?;
    writeln!(out, "End")?;
    Ok(())
}

/// Write `model` to an LP file, creating parent directories
pub fn save_lp<P: AsRef<Path>>(model: &BipModel, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create LP file: {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    write_lp(model, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_section<W: Write>(out: &mut W, title: &str, model: &BipModel, domain: VariableDomain) -> Result<()> {
    let names: Vec<&str> = model
        .variables()
        .iter()
        .filter(|v| v.domain == domain)
        .map(|v| v.name.as_str())
        .collect();
    if names.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}", title)?;
    for chunk in names.chunks(10) {
        writeln!(out, " {}", chunk.join(" "))?;
    }
    Ok(())
}

fn format_expr(model: &BipModel, expr: &LinearExpr) -> String {
    if expr.is_empty() {
        return "0".to_string();
    }

    let mut text = String::new();
    for (i, &(var, coeff)) in expr.terms.iter().enumerate() {
        let name = model.variable(var).map(|v| v.name.as_str()).unwrap_or("?");
        let sign = if coeff < 0.0 { "-" } else { "+" };
        if i > 0 {
            text.push(' ');
            text.push_str(sign);
            text.push(' ');
        } else if coeff < 0.0 {
            text.push_str("- ");
        }
        let magnitude = coeff.abs();
        if magnitude != 1.0 {
            text.push_str(&format_number(magnitude));
            text.push(' ');
        }
        text.push_str(name);
    }
    text
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
