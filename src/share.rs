use qrcode::render::svg;
use qrcode::QrCode;
use url::form_urlencoded;

/// Outbound share-intent URLs for one profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    pub url: String,
    pub title: String,
    pub x: String,
    pub facebook: String,
    pub line: String,
}

impl ShareLinks {
    pub fn new(url: &str, title: &str) -> Self {
        let text = format!("{}\n{}", title, url);
        Self {
            url: url.to_string(),
            title: title.to_string(),
            x: intent_url("https://twitter.com/intent/tweet", &[("text", text.as_str())]),
            facebook: intent_url("https://www.facebook.com/sharer/sharer.php", &[("u", url)]),
            line: intent_url(
                "https://social-plugins.line.me/lineit/share",
                &[("url", url), ("text", text.as_str())],
            ),
        }
    }
}

fn intent_url(base: &str, params: &[(&str, &str)]) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("{}?{}", base, query)
}

/// Title used when sharing a profile.
pub fn share_title(name: &str) -> String {
    format!("{}の自己紹介", name)
}

/// Public URL of a profile page.
pub fn profile_url(origin: &str, id: &str) -> String {
    format!("{}/{}", origin.trim_end_matches('/'), id)
}

/// Scannable SVG of `url` for the share dialog.
pub fn qr_svg(url: &str) -> Result<String, qrcode::types::QrError> {
    let code = QrCode::new(url.as_bytes())?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(160, 160)
        .max_dimensions(220, 220)
        .dark_color(svg::Color("#1c1917"))
        .light_color(svg::Color("#ffffff"))
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_pairs(link: &str) -> Vec<(String, String)> {
        url::Url::parse(link)
            .unwrap()
            .query_pairs()
            .into_owned()
            .collect()
    }

    #[test]
    fn x_link_carries_title_and_url() {
        let links = ShareLinks::new("https://p.example/aB3dE6gH", "花子の自己紹介");
        assert!(links.x.starts_with("https://twitter.com/intent/tweet?"));
        assert_eq!(
            query_pairs(&links.x),
            vec![(
                "text".to_string(),
                "花子の自己紹介\nhttps://p.example/aB3dE6gH".to_string()
            )]
        );
    }

    #[test]
    fn facebook_link_carries_url_only() {
        let links = ShareLinks::new("https://p.example/aB3dE6gH", "t");
        assert!(links
            .facebook
            .starts_with("https://www.facebook.com/sharer/sharer.php?"));
        assert_eq!(
            query_pairs(&links.facebook),
            vec![("u".to_string(), "https://p.example/aB3dE6gH".to_string())]
        );
    }

    #[test]
    fn line_link_carries_url_and_text() {
        let links = ShareLinks::new("https://p.example/aB3dE6gH", "t");
        let pairs = query_pairs(&links.line);
        assert_eq!(pairs[0], ("url".to_string(), "https://p.example/aB3dE6gH".to_string()));
        assert_eq!(pairs[1].0, "text");
        assert_eq!(pairs[1].1, "t\nhttps://p.example/aB3dE6gH");
    }

    #[test]
    fn special_characters_are_percent_encoded() {
        let links = ShareLinks::new("https://p.example/x?a=1&b=2", "A & B");
        let raw_query = links.facebook.split_once('?').unwrap().1;
        assert!(!raw_query.contains("&b=2"));
        assert!(raw_query.contains("%26"));
    }

    #[test]
    fn title_and_url_helpers() {
        assert_eq!(share_title("太郎"), "太郎の自己紹介");
        assert_eq!(
            profile_url("http://localhost:3000/", "aB3dE6gH"),
            "http://localhost:3000/aB3dE6gH"
        );
    }

    #[test]
    fn qr_svg_renders() {
        let svg = qr_svg("https://p.example/aB3dE6gH").unwrap();
        assert!(svg.contains("<svg"));
    }
}
