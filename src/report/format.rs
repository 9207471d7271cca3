//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the readers and the fit stay free of presentation concerns
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{FitConfig, FitResult, LogColumn, LogField};

/// Format a two-column table such as `(voltage, capacitance)`.
pub fn format_series(title: &str, headers: [&str; 2], x: &[f64], y: &[f64]) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {title} (n={}) ===\n", x.len().min(y.len())));
    push_row(&mut out, &[headers[0].to_string(), headers[1].to_string()], 14);
    push_rule(&mut out, 2, 14);
    for (a, b) in x.iter().zip(y) {
        push_row(&mut out, &[format!("{a:.4}"), format!("{b:.6e}")], 14);
    }
    out
}

/// Format requested log columns side by side.
pub fn format_log_columns(fields: &[LogField], columns: &[LogColumn]) -> String {
    let mut out = String::new();
    let rows = columns.first().map_or(0, LogColumn::len);
    out.push_str(&format!("=== log (n={rows}) ===\n"));

    let header: Vec<String> = fields.iter().map(|f| f.name().to_string()).collect();
    push_row(&mut out, &header, 10);
    push_rule(&mut out, fields.len(), 10);
    for idx in 0..rows {
        let row: Vec<String> = columns
            .iter()
            .map(|c| truncate(&c.display_at(idx).unwrap_or_default(), 10))
            .collect();
        push_row(&mut out, &row, 10);
    }
    out
}

/// Format the fit summary.
pub fn format_fit_summary(fit: &FitResult, config: &FitConfig) -> String {
    let mut out = String::new();

    out.push_str("=== ecv - Mott-Schottky fit ===\n");
    out.push_str(&format!("Source: {}\n", config.cv_path.display()));
    out.push_str(&format!("Model: {}\n", config.model.display_name()));
    out.push_str(&format!(
        "Window: [{}, {}] V | eps={}\n",
        fmt_bound(config.vmin, "min"),
        fmt_bound(config.vmax, "max"),
        config.eps
    ));
    out.push_str(&format!("Points: n={}\n", fit.n_points));
    out.push_str(&format!(
        "1/C² = {:.6} · V + {:.6}  (cm⁴/µF²)\n",
        fit.slope, fit.intercept
    ));
    out.push_str(&format!("Doping: {:.4e} cm⁻³\n", fit.doping));
    out.push_str(&format!("Fit line V: {}\n", fmt_vec(&fit.volt_fit)));
    out.push_str(&format!("Fit line 1/C²: {}\n", fmt_vec(&fit.cap_fit)));

    out
}

/// List the log schema, one field name per line.
pub fn format_log_fields() -> String {
    let mut out = String::new();
    for field in LogField::ALL {
        out.push_str(field.name());
        out.push('\n');
    }
    out
}

fn push_row(out: &mut String, cells: &[String], width: usize) {
    let line: Vec<String> = cells.iter().map(|c| format!("{c:>width$}")).collect();
    out.push_str(line.join(" ").trim_end());
    out.push('\n');
}

fn push_rule(out: &mut String, cells: usize, width: usize) {
    let line: Vec<String> = (0..cells).map(|_| "-".repeat(width)).collect();
    out.push_str(&line.join(" "));
    out.push('\n');
}

fn fmt_bound(v: Option<f64>, fallback: &str) -> String {
    v.map(|x| format!("{x}")).unwrap_or_else(|| fallback.to_string())
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
