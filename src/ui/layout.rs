//! HTML document shell shared by every exported page.

/// Escape text content. Quotes are left alone since they are legal in text nodes.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

/// Wrap page content in a complete HTML document.
pub fn html_document(title: &str, description: &str, scripts: &[String], content: &str) -> String {
    let scripts: String = scripts
        .iter()
        .map(|src| format!("\n    <script type=\"module\" src=\"{}\"></script>", escape_attr(src)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="{description}">
    <title>{title}</title>
    <link rel="stylesheet" href="/app.css">{scripts}
</head>
<body class="antialiased">
{content}
</body>
</html>
"#,
        title = escape_text(title),
        description = escape_attr(description),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text_keeps_apostrophe() {
        assert_eq!(escape_text("Roger's <b>"), "Roger's &lt;b&gt;");
    }

    #[test]
    fn test_document_lists_scripts() {
        let html = html_document("T", "d", &["/a.js".to_string()], "<p>x</p>");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<script type="module" src="/a.js"></script>"#));
        assert!(html.contains("<title>T</title>"));
    }
}
