//! Rendering of resolution key values as source literals.

use std::fmt::Write;
use tessera_symbols::decl::ConstValue;

/// Placeholder emitted for key value kinds the generator does not support.
pub const UNSUPPORTED_KEY_PLACEHOLDER: &str = "default /* unsupported service key */";

/// Renders a key value as a literal in emitted source. Total: unsupported
/// kinds render as [UNSUPPORTED_KEY_PLACEHOLDER] instead of failing.
pub fn format_key_literal(value: &ConstValue) -> String {
    match value {
        ConstValue::Null => "null".to_string(),
        ConstValue::Str(value) => format_string_literal(value),
        ConstValue::Bool(true) => "true".to_string(),
        ConstValue::Bool(false) => "false".to_string(),
        ConstValue::Char(value) => format_char_literal(*value),
        ConstValue::Int(value) => value.to_string(),
        ConstValue::Long(value) => format!("{}L", value),
        ConstValue::UInt(value) => format!("{}U", value),
        ConstValue::ULong(value) => format!("{}UL", value),
        ConstValue::Float(value) => {
            if value.is_nan() {
                "float.NaN".to_string()
            } else if *value == f32::INFINITY {
                "float.PositiveInfinity".to_string()
            } else if *value == f32::NEG_INFINITY {
                "float.NegativeInfinity".to_string()
            } else {
                format!("{}f", value)
            }
        }
        ConstValue::Double(value) => {
            if value.is_nan() {
                "double.NaN".to_string()
            } else if *value == f64::INFINITY {
                "double.PositiveInfinity".to_string()
            } else if *value == f64::NEG_INFINITY {
                "double.NegativeInfinity".to_string()
            } else {
                format!("{}d", value)
            }
        }
        ConstValue::Unsupported(_) => UNSUPPORTED_KEY_PLACEHOLDER.to_string(),
    }
}

fn format_string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for ch in value.chars() {
        push_escaped(&mut literal, ch, '"');
    }
    literal.push('"');
    literal
}

fn format_char_literal(value: char) -> String {
    let mut literal = String::from("'");
    push_escaped(&mut literal, value, '\'');
    literal.push('\'');
    literal
}

fn push_escaped(target: &mut String, ch: char, quote: char) {
    match ch {
        '\\' => target.push_str("\\\\"),
        '\n' => target.push_str("\\n"),
        '\r' => target.push_str("\\r"),
        '\t' => target.push_str("\\t"),
        '\0' => target.push_str("\\0"),
        _ if ch == quote => {
            target.push('\\');
            target.push(ch);
        }
        _ if (ch as u32) < 0x20 => {
            let _ = write!(target, "\\u{:04X}", ch as u32);
        }
        _ => target.push(ch),
    }
}
