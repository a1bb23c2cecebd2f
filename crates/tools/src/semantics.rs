//! Tool annotations derived from HTTP method semantics.

use crate::catalog::ToolDef;
use rmcp::model::ToolAnnotations;
use starling_api::Method;

/// Baseline hints for a tool backed by a single HTTP method (RFC 9110 semantics).
///
/// `openWorldHint` is always `true`: every tool talks to the bank.
#[must_use]
pub fn annotations_for_method(method: &Method) -> ToolAnnotations {
    let base = ToolAnnotations::new().open_world(true);

    if method == Method::GET || method == Method::HEAD {
        return base.read_only(true).destructive(false).idempotent(true);
    }
    if method == Method::POST {
        return base.read_only(false).destructive(false).idempotent(false);
    }
    if method == Method::PUT || method == Method::DELETE {
        return base.read_only(false).destructive(true).idempotent(true);
    }
    base
}

/// Full annotations for a catalog entry.
///
/// The entry's own read-only flag wins over the method baseline. Calls that mint a fresh
/// idempotency key per invocation (transfers, payments) are not idempotent, whatever the method.
#[must_use]
pub fn annotations_for(def: &ToolDef) -> ToolAnnotations {
    let mut a = annotations_for_method(&def.action.method());
    a.title = Some(def.title.to_string());
    a.read_only_hint = Some(def.read_only);
    if def.read_only {
        a.destructive_hint = Some(false);
    }
    if def.action.mints_idempotency_key() {
        a.idempotent_hint = Some(false);
    }
    a
}
