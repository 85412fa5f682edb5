use log::trace;

const HEAD_CLOSE: &str = "</head>";

/// Builds the resource hint pointing a page at the preload aggregator.
///
/// `&` and `"` in `href` are escaped so the attribute stays well formed.
pub fn modulepreload_link(href: &str) -> String {
    format!(r#"<link rel="modulepreload" href="{}">"#, escape_attribute(href))
}

fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inserts `snippet` right before the first closing head tag.
///
/// Returns `None` when the document has no `</head>` (matched ignoring ASCII
/// case), leaving the decision of what to do with such a page to the caller.
pub fn inject_into_head(html: &str, snippet: &str) -> Option<String> {
    let idx = find_ascii_case_insensitive(html, HEAD_CLOSE)?;
    trace!("Injecting {} bytes before </head> at offset {}", snippet.len(), idx);

    let mut out = String::with_capacity(html.len() + snippet.len());
    out.push_str(&html[..idx]);
    out.push_str(snippet);
    out.push_str(&html[idx..]);
    Some(out)
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack.as_bytes().windows(needle.len()).position(|w| w.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modulepreload_link() {
        assert_eq!(
            modulepreload_link("./_meta/module-preload.mjs"),
            r#"<link rel="modulepreload" href="./_meta/module-preload.mjs">"#
        );
    }

    #[test]
    fn test_modulepreload_link_escapes_href() {
        assert_eq!(
            modulepreload_link(r#"./a&b/"q"/module-preload.mjs"#),
            r#"<link rel="modulepreload" href="./a&amp;b/&quot;q&quot;/module-preload.mjs">"#
        );
    }

    #[test]
    fn test_inject_empty_head() {
        let out = inject_into_head("<html><head></head><body></body></html>", "<x>").unwrap();
        assert_eq!(out, "<html><head><x></head><body></body></html>");
    }

    #[test]
    fn test_inject_keeps_existing_head_content() {
        let html = "<head>\n  <title>t</title>\n</head>\n<body>hi</body>";
        let out = inject_into_head(html, "<x>").unwrap();
        assert_eq!(out, "<head>\n  <title>t</title>\n<x></head>\n<body>hi</body>");
    }

    #[test]
    fn test_inject_uppercase_head() {
        let out = inject_into_head("<HEAD></HEAD>", "<x>").unwrap();
        assert_eq!(out, "<HEAD><x></HEAD>");
    }

    #[test]
    fn test_inject_uses_first_head_close() {
        let html = "<head></head><body><script>'</head>'</script></body>";
        let out = inject_into_head(html, "<x>").unwrap();
        assert!(out.starts_with("<head><x></head><body>"));
        assert_eq!(out.matches("<x>").count(), 1);
    }

    #[test]
    fn test_inject_without_head() {
        assert_eq!(inject_into_head("<p>fragment</p>", "<x>"), None);
    }

    #[test]
    fn test_inject_non_ascii_document() {
        let out = inject_into_head("<head><title>héllo ✓</title></head>", "<x>").unwrap();
        assert_eq!(out, "<head><title>héllo ✓</title><x></head>");
    }
}
