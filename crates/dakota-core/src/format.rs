//! Value formatting for Dakota input and results files
//!
//! Reals use the shortest round-trip form with a two-digit signed
//! exponent outside `[1e-4, 1e16)` (`2.0`, `0.1`, `1e-05`). Strings are
//! single-quoted. Existing study files use this layout, and generated
//! text stays byte-compatible with them.

use std::fmt::Display;

/// Render a real number in shortest round-trip form, always with a
/// decimal point or exponent.
pub fn real(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..16).contains(&exponent) {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

/// Quote a string literal for a Dakota input file.
pub fn quote(value: &str) -> String {
    let delimiter = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(delimiter);
    for c in value.chars() {
        if c == '\\' || c == delimiter {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(delimiter);
    out
}

/// Render a list of reals separated by single spaces, each preceded by a space.
pub fn reals(values: &[f64]) -> String {
    values.iter().map(|v| format!(" {}", real(*v))).collect()
}

/// Render a list of integers (or any displayable values) the same way.
pub fn items<T: Display>(values: &[T]) -> String {
    values.iter().map(|v| format!(" {v}")).collect()
}

/// Render a list of quoted strings.
pub fn quoted(values: &[String]) -> String {
    values.iter().map(|v| format!(" {}", quote(v))).collect()
}
