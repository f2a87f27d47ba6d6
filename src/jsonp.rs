//! JSONP request building and response unwrapping.
//!
//! Providers answer with a script of the form `callback({...});`. Instead of
//! injecting that script into a page, the body is fetched as text and the
//! argument of the callback invocation is extracted and parsed as JSON.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::{Result, SuggestError};

/// Generates a fresh callback token, unique per request.
pub fn callback_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let random = Uuid::new_v4().simple().to_string();
    format!("suggestion_callback_{}_{}", millis, &random[..9])
}

/// Expands an endpoint template with the URL-encoded query and callback token.
pub fn build_url(template: &str, query: &str, callback: &str) -> Result<String> {
    let expanded = template
        .replace("{query}", &urlencoding::encode(query))
        .replace("{callback}", callback);
    let url = Url::parse(&expanded)?;
    Ok(url.into())
}

/// Returns the text between the callback's parentheses.
///
/// A body that is already bare JSON (starting with `{` or `[`) is returned
/// as is.
pub fn extract_payload<'a>(body: &'a str, callback: &str) -> Result<&'a str> {
    let body = body.trim();
    if body.starts_with('{') || body.starts_with('[') {
        return Ok(body);
    }

    let search_from = match body.find(callback) {
        Some(pos) if !callback.is_empty() => pos + callback.len(),
        _ => 0,
    };
    let open = body[search_from..]
        .find('(')
        .map(|i| search_from + i)
        .ok_or_else(|| SuggestError::Parse("missing JSONP callback invocation".to_string()))?;
    let close = body
        .rfind(')')
        .filter(|&i| i > open)
        .ok_or_else(|| SuggestError::Parse("unterminated JSONP callback".to_string()))?;

    Ok(body[open + 1..close].trim())
}

/// Parses the first JSON value of a payload, ignoring trailing arguments.
pub fn parse_payload(payload: &str) -> Result<Value> {
    let mut stream = serde_json::Deserializer::from_str(payload).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(SuggestError::Parse(format!("invalid JSON payload: {}", e))),
        None => Err(SuggestError::Parse("empty JSONP payload".to_string())),
    }
}

/// Extracts and parses the JSON argument of a JSONP response.
pub fn unwrap(body: &str, callback: &str) -> Result<Value> {
    parse_payload(extract_payload(body, callback)?)
}

/// Collects string items from a JSON array, failing on any other shape.
pub fn string_array(value: &Value) -> Result<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| SuggestError::Parse("expected an array of suggestions".to_string()))?;
    Ok(items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_name_unique() {
        let a = callback_name();
        let b = callback_name();
        assert!(a.starts_with("suggestion_callback_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_callback_name_is_identifier() {
        let name = callback_name();
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn test_build_url_encodes_query() {
        let url = build_url(
            "https://example.com/su?wd={query}&cb={callback}",
            "rust 语言",
            "cb_1",
        )
        .unwrap();
        assert_eq!(
            url,
            "https://example.com/su?wd=rust%20%E8%AF%AD%E8%A8%80&cb=cb_1"
        );
    }

    #[test]
    fn test_build_url_encodes_reserved_characters() {
        let url = build_url("https://example.com/?q={query}", "a&b=c", "x").unwrap();
        assert_eq!(url, "https://example.com/?q=a%26b%3Dc");
    }

    #[test]
    fn test_build_url_invalid_template() {
        let err = build_url("no scheme {query}", "q", "cb").unwrap_err();
        assert!(matches!(err, SuggestError::UrlParse(_)));
    }

    #[test]
    fn test_unwrap_object_payload() {
        let value = unwrap(r#"cb_1({"s":["a","b"]});"#, "cb_1").unwrap();
        assert_eq!(value["s"][1], "b");
    }

    #[test]
    fn test_unwrap_ignores_trailing_arguments() {
        let value = unwrap(r#"window.sogou.sug(["q",["x","y"]],-1);"#, "window.sogou.sug").unwrap();
        assert_eq!(value[1][0], "x");
    }

    #[test]
    fn test_unwrap_bare_json() {
        let value = unwrap(r#"["q",["x"]]"#, "cb").unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn test_unwrap_with_comment_prefix() {
        let value = unwrap("/**/ cb_2({\"ok\":true})", "cb_2").unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn test_unwrap_missing_wrapper() {
        let err = unwrap("<html>blocked</html>", "cb").unwrap_err();
        assert!(matches!(err, SuggestError::Parse(_)));
    }

    #[test]
    fn test_unwrap_invalid_json() {
        let err = unwrap("cb({q:\"x\"})", "cb").unwrap_err();
        assert!(matches!(err, SuggestError::Parse(_)));
    }

    #[test]
    fn test_extract_payload_non_json_literal() {
        let payload = extract_payload("cb({q:\"x\",s:[\"a\"]});", "cb").unwrap();
        assert_eq!(payload, "{q:\"x\",s:[\"a\"]}");
    }

    #[test]
    fn test_string_array() {
        let value: Value = serde_json::from_str(r#"["a", 1, "b"]"#).unwrap();
        assert_eq!(string_array(&value).unwrap(), vec!["a", "b"]);
        assert!(string_array(&Value::Null).is_err());
    }
}
