use serde_json::Value;

/// Message subtypes that still carry a user request.
const HANDLED_SUBTYPES: &[&str] = &["file_share"];

/// Returns `true` for events the bot must not act on: anything posted by a bot
/// (including this one), edits, deletions and other system subtypes, and events
/// without a channel or timestamp to react to.
#[must_use]
pub fn should_skip_event(event: &Value) -> bool {
    if event.get("bot_id").is_some_and(|v| !v.is_null()) {
        return true;
    }

    if let Some(subtype) = event.get("subtype").and_then(Value::as_str)
        && !HANDLED_SUBTYPES.contains(&subtype)
    {
        return true;
    }

    let has_channel = event.get("channel").and_then(Value::as_str).is_some();
    let has_ts = event.get("ts").and_then(Value::as_str).is_some();
    !(has_channel && has_ts)
}
