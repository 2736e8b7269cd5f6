//! Helpers shared by the notification channels.

use serde_json::Value;

/// Maximum length of a remote response body kept in error messages.
pub const MAX_BODY_LENGTH: usize = 4000;

/// Truncates `s` to at most `max_len` bytes without splitting a character.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &s[..end])
}

/// Replaces values of secret-looking keys (passwords, tokens, secrets,
/// api keys, credentials) with `"***"`, recursing into nested objects and
/// arrays.
pub fn redact_sensitive_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut redacted = serde_json::Map::new();
            for (key, val) in map {
                let key_lower = key.to_lowercase();
                let is_sensitive = ["password", "passwd", "token", "secret", "api_key", "apikey", "credentials"]
                    .iter()
                    .any(|needle| key_lower.contains(needle));

                if is_sensitive {
                    redacted.insert(key.clone(), Value::String("***".to_string()));
                } else {
                    redacted.insert(key.clone(), redact_sensitive_json(val));
                }
            }
            Value::Object(redacted)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(redact_sensitive_json).collect()),
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 5), "hello... [truncated]");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        // '°' is two bytes; cutting at 3 would land inside it
        assert_eq!(truncate_string("31°C", 3), "31... [truncated]");
    }

    #[test]
    fn redacts_nested_secrets() {
        let json = serde_json::json!({
            "smtp_username": "alerts",
            "smtp_password": "secret123",
            "headers": { "access_token": "xyz789", "accept": "json" },
            "list": [{ "api_key": "k" }]
        });

        let redacted = redact_sensitive_json(&json);
        assert_eq!(redacted["smtp_username"], "alerts");
        assert_eq!(redacted["smtp_password"], "***");
        assert_eq!(redacted["headers"]["access_token"], "***");
        assert_eq!(redacted["headers"]["accept"], "json");
        assert_eq!(redacted["list"][0]["api_key"], "***");
    }
}
