/// Builds a server-push response body: one `data:` event per fragment,
/// terminated by the `[DONE]` sentinel. Fragments keep their own leading
/// whitespace; the single space after `data:` is the SSE field separator.
pub fn sse_body(fragments: &[&str]) -> String {
    let mut events = fragments
        .iter()
        .map(|fragment| {
            return format!("data: {fragment}\n\n");
        })
        .collect::<Vec<String>>();

    events.push("data: [DONE]\n\n".to_string());

    return events.join("");
}

/// A history payload spanning two sessions, as `GET /chat/history` returns it.
pub fn history_fixture() -> &'static str {
    return r#"[
  {"content": "hello", "role": "user", "sessionId": "s1"},
  {"content": "Hi there", "role": "assistant", "sessionId": "s1"},
  {"content": "second conversation", "role": "user", "sessionId": "s2"}
]"#;
}

#[cfg(test)]
mod tests {
    use super::sse_body;

    #[test]
    fn it_builds_sse_bodies() {
        let body = sse_body(&["Hi", " there"]);
        assert_eq!(body, "data: Hi\n\ndata:  there\n\ndata: [DONE]\n\n");
    }
}
