//! Text exchanged with an external blueprint agent.

use crate::blueprint::ModificationBlueprint;
use crate::generator::PlanRequest;
use crate::{Error, Result};

/// Role and strategy given to the agent.
pub fn system_prompt() -> &'static str {
    "You are a senior front-end architect. Your task is to locate the code that must change \
     to resolve an entry of a UI diagnostic report.\n\
     Tools: search_codebase, list_files.\n\
     Strategy: for TEXT_MISMATCH search for `actual`; for MISSING_WIDGET search for \
     `sibling_text` or `parent_role`; for LAYOUT/SIZE issues locate the style or component \
     definition. Answer strictly with ModificationBlueprint JSON."
}

/// User message carrying one issue and its context as JSON.
pub fn render_request(request: &PlanRequest) -> Result<String> {
    let payload = serde_json::to_string(request).map_err(|source| Error::Encode { source })?;
    Ok(format!(
        "Analyze the following UI issue and produce a modification blueprint:\n{payload}\n\
         The final answer must strictly follow the ModificationBlueprint JSON structure."
    ))
}

/// Parses an agent reply: bare JSON, or the first fenced code block in the text.
pub fn parse_reply(reply: &str) -> Result<ModificationBlueprint> {
    let body = json_body(reply);
    if body.is_empty() {
        return Err(Error::EmptyReply);
    }
    serde_json::from_str(body).map_err(|source| Error::InvalidReply { source })
}

fn json_body(reply: &str) -> &str {
    let text = reply.trim();
    if text.starts_with('{') {
        return text;
    }
    let Some(start) = text.find("```") else {
        return text;
    };
    let rest = &text[start + 3..];
    // Skip the info string (`json`, `JSON`, ...).
    let body = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => rest,
    };
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}
