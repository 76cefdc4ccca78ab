//! Renderer for the small Markdown dialect allowed in topic answers:
//! line breaks, `![alt](url)` images and `[text](url)` links.
//!
//! All input is HTML-escaped before any substitution, so the only markup in
//! the output is what this module constructs. A URL containing `)` ends the
//! match early; that is a known limitation of the dialect.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Images and links in one left-to-right pass, so a constructed tag is never
/// rescanned. Captures exclude `<`, which after escaping only appears in the
/// `<br>` this module inserts.
static IMAGE_OR_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(!?)\[([^\[\]<]*)\]\(([^)<]+)\)").expect("image/link pattern compiles")
});

/// Render answer text to an HTML fragment that is safe to insert unescaped.
pub fn render(text: &str) -> String {
    let escaped = escape_html(text);

    let html = escaped
        .replace("\r\n", "<br>")
        .replace(['\n', '\r'], "<br>");

    IMAGE_OR_LINK
        .replace_all(&html, |caps: &Captures| {
            let (is_image, text, url) = (!caps[1].is_empty(), &caps[2], &caps[3]);
            if is_image && is_allowed_url(url, true) {
                format!(
                    r#"<img src="{}" alt="{}" class="answer-image" style="max-height: 200px; object-fit: cover;" />"#,
                    url, text
                )
            } else if !is_image && !text.is_empty() && is_allowed_url(url, false) {
                format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="answer-link">{}</a>"#,
                    url, text
                )
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Relative URLs and http(s)/mailto only; images may also be `data:image/`.
fn is_allowed_url(url: &str, image: bool) -> bool {
    let url = url.trim();
    let scheme_end = url.find(':');
    let path_start = url.find(['/', '?', '#']);

    let scheme = match (scheme_end, path_start) {
        (Some(colon), Some(path)) if path < colon => return true,
        (Some(colon), _) => url[..colon].to_ascii_lowercase(),
        (None, _) => return true,
    };

    match scheme.as_str() {
        "http" | "https" => true,
        "mailto" => !image,
        "data" => image && url[5..].to_ascii_lowercase().starts_with("image/"),
        _ => false,
    }
}
