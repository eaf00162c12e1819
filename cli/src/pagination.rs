use serde_json::Value;

/// Next-page link of a feed response, if the API sent one.
pub fn next_page_url(body: &Value) -> Option<String> {
    body.get("pagination")?
        .get("next")?
        .as_str()
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}
