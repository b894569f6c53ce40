//! Mapping from authorizer claims to the assistant's caller context.

use serde_json::Value;

use crate::models::{ActorContext, Role};
use crate::{Error, Result};

fn claim<'a>(claims: &'a Value, key: &str) -> Option<&'a str> {
    claims
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Build the caller context from already-validated identity claims.
///
/// `Value::Null` means no identity and yields `Ok(None)` (demo mode).
pub fn actor_from_claims(claims: &Value) -> Result<Option<ActorContext>> {
    if claims.is_null() {
        return Ok(None);
    }

    let id = claim(claims, "sub").ok_or_else(|| Error::Auth("Missing sub claim".to_string()))?;
    let role: Role = claim(claims, "custom:role")
        .ok_or_else(|| Error::Auth("Missing custom:role claim".to_string()))?
        .parse()?;
    let email = claim(claims, "email").unwrap_or_default();
    let first_name = claim(claims, "given_name")
        .or_else(|| claim(claims, "name"))
        .unwrap_or(email);

    // Claims arrive as strings from API Gateway, booleans from other issuers.
    let active = match claims.get("custom:active") {
        Some(Value::Bool(active)) => *active,
        Some(Value::String(active)) => active != "false" && active != "0",
        _ => true,
    };

    Ok(Some(ActorContext {
        id: id.to_string(),
        first_name: first_name.to_string(),
        last_name: claim(claims, "family_name").map(String::from),
        email: email.to_string(),
        phone: claim(claims, "phone_number").map(String::from),
        role,
        active,
    }))
}
