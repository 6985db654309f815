//! # Value Rendering
//!
//! Turns a [`Value`] into the textual syntax of the service's own expression language,
//! so that a rendered value can be pasted back into a report.
//!
//! The output format is relied upon by scripts and golden files. In particular:
//! - lists are spread over lines, with the first element unindented and every following
//!   element indented by two spaces
//! - an empty record renders with two spaces between the braces (`Tag {  }`)
//! - strings are quoted but not escaped
//! - unknown value kinds render as the empty string

use crate::value::{QualifiedName, Value};

pub fn render_qualified_name(qn: &QualifiedName) -> String {
    qn.to_string()
}

pub fn render_value(value: &Value) -> String {
    match value {
        Value::Int { i } => i.to_string(),
        Value::String { s } => format!("\"{}\"", s),
        Value::Float { d } => render_float(*d),
        Value::Instant { instant } => format!("#{}#", instant),
        Value::Boolean { b } => String::from(if *b { "True" } else { "False" }),
        Value::Record { record_tag, fields } => {
            let rendered: Vec<String> = fields
                .iter()
                .map(|(key, field)| format!("{} = {}", key, render_value(field)))
                .collect();
            format!(
                "{} {{ {} }}",
                render_qualified_name(record_tag),
                rendered.join(", ")
            )
        }
        Value::List { elements } => {
            let rendered: Vec<String> = elements.iter().map(render_value).collect();
            format!("[\n{}\n]", rendered.join(",\n  "))
        }
        Value::Constructor { name, args } => {
            let mut parts = Vec::with_capacity(args.len() + 1);
            parts.push(render_qualified_name(name));
            parts.extend(args.iter().map(render_argument));
            parts.join(" ")
        }
        Value::Pseudo { bound_name } => render_qualified_name(bound_name),
        Value::Unknown => String::new(),
    }
}

/// Constructor applications with arguments need parentheses when nested.
fn render_argument(arg: &Value) -> String {
    match arg {
        Value::Constructor { args, .. } if !args.is_empty() => {
            format!("({})", render_value(arg))
        }
        _ => render_value(arg),
    }
}

/// Whole numbers get a trailing `.0` so they read back as floats.
fn render_float(d: f64) -> String {
    let text = number_text(d);
    if d.is_finite() && d.fract() == 0.0 {
        format!("{}.0", text)
    } else {
        text
    }
}

/// Shortest round-trip text of `d`, switching to exponent notation outside
/// `1e-6 <= |d| < 1e21` the way the service's own number printer does.
fn number_text(d: f64) -> String {
    if d == 0.0 {
        // also -0.0
        return "0".to_string();
    }
    if d.is_infinite() {
        return String::from(if d > 0.0 { "Infinity" } else { "-Infinity" });
    }
    let magnitude = d.abs();
    if d.is_nan() || (1e-6..1e21).contains(&magnitude) {
        return d.to_string();
    }
    let text = format!("{:e}", d);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => text,
    }
}
