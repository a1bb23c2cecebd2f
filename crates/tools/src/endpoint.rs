//! Endpoint templating.
//!
//! Templates look like `/api/v2/accounts/{accountUid}/balance`. Each `{name}` is replaced by the
//! argument of that name, percent-encoded as a single path segment so the string we sign is the
//! string that goes on the wire. `{@uuid}` is replaced by a fresh v4 UUID on every render.

use crate::error::{Result, ToolError};
use rmcp::model::JsonObject;
use serde_json::Value;
use uuid::Uuid;

pub const UUID_PLACEHOLDER: &str = "{@uuid}";

/// Fill a path template from arguments.
///
/// # Errors
///
/// Returns an input error for an unterminated placeholder, a missing/non-scalar argument, or a
/// dot segment (`.` or `..`) as an argument.
pub fn render_path(template: &str, args: &JsonObject) -> Result<String> {
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}').ok_or_else(|| {
            ToolError::Input(format!("unterminated placeholder in endpoint '{template}'"))
        })?;
        let name = &after[..end];
        if name == "@uuid" {
            out.push_str(&Uuid::new_v4().to_string());
        } else {
            out.push_str(&encode_path_segment(&path_value(name, args)?));
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn path_value(name: &str, args: &JsonObject) -> Result<String> {
    match args.get(name) {
        // URL parsing collapses dot segments, even percent-encoded ones.
        Some(Value::String(s)) if s == "." || s == ".." => Err(ToolError::Input(format!(
            "path parameter '{name}' must not be '{s}'"
        ))),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(ToolError::Input(format!(
            "path parameter '{name}' must be a string, got {other}"
        ))),
        None => Err(ToolError::Input(format!(
            "missing required path parameter '{name}'"
        ))),
    }
}

/// `application/x-www-form-urlencoded` query string, skipping empty values.
#[must_use]
pub fn query_string(pairs: &[(&str, &str)]) -> Option<String> {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (k, v) in pairs {
        if v.is_empty() {
            continue;
        }
        serializer.append_pair(k, v);
        any = true;
    }
    any.then(|| serializer.finish())
}

fn encode_path_segment(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    out
}

fn is_unreserved(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~')
}
