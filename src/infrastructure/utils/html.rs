/// Escapes text for use in HTML content and quoted attributes.
pub fn escape(text: &str) -> String {
    ammonia::clean_text(text)
}

/// Escapes text and turns its line breaks into `<br>` tags.
pub fn nl2br(text: &str) -> String {
    text.lines()
        .map(escape)
        .collect::<Vec<_>>()
        .join("<br>\n")
}
