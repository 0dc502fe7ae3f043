use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Markdown `![alt](path "title")` and HTML `<img ... src="path">` in one pattern,
/// so a single pass rewrites both and never revisits its own output.
static IMAGE_REF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?x)
        (?P<md_head>!\[[^\]]*\]\(\s*)(?P<md_path><[^>]+>|[^)\s]+)
        |
        (?P<html_head><img\b[^>]*?\bsrc\s*=\s*)(?P<quote>["'])(?P<html_path>[^"'>]*)
        "#,
    )
    .unwrap()
});

fn is_absolute_reference(path: &str) -> bool {
    let lowered = path.to_ascii_lowercase();
    lowered.starts_with("http://")
        || lowered.starts_with("https://")
        || lowered.starts_with("//")
        || lowered.starts_with('#')
        || lowered.starts_with("data:")
        || lowered.starts_with("mailto:")
}

/// Rewrites one image reference against `raw_base` (which ends with `/`).
///
/// The first applicable rule wins: a `./` prefix is replaced, then a `/`
/// prefix, then any other relative path is prefixed. URLs, fragments and
/// `data:`/`mailto:` references are returned unchanged.
///
/// ```
/// use repodigest::docs::rewrite_image_url;
///
/// let base = "https://raw.githubusercontent.com/o/r/main/";
/// assert_eq!(rewrite_image_url("./a.png", base), format!("{}a.png", base));
/// assert_eq!(rewrite_image_url("/docs/a.png", base), format!("{}docs/a.png", base));
/// assert_eq!(rewrite_image_url("img/a.png", base), format!("{}img/a.png", base));
/// assert_eq!(rewrite_image_url("https://x.io/a.png", base), "https://x.io/a.png");
/// ```
pub fn rewrite_image_url(path: &str, raw_base: &str) -> String {
    if path.is_empty() || is_absolute_reference(path) {
        return path.to_string();
    }
    if let Some(rest) = path.strip_prefix("./") {
        return format!("{}{}", raw_base, rest);
    }
    if let Some(rest) = path.strip_prefix('/') {
        return format!("{}{}", raw_base, rest);
    }
    format!("{}{}", raw_base, path)
}

/// Rewrites every relative image reference in README text into an absolute
/// raw-content URL.
pub fn rewrite_image_paths(text: &str, raw_base: &str) -> String {
    IMAGE_REF_RE
        .replace_all(text, |caps: &Captures| {
            if let (Some(head), Some(path)) = (caps.name("md_head"), caps.name("md_path")) {
                let raw = path.as_str();
                // `![alt](<path with spaces>)`
                let rewritten = match raw.strip_prefix('<').and_then(|p| p.strip_suffix('>')) {
                    Some(inner) => format!("<{}>", rewrite_image_url(inner, raw_base)),
                    None => rewrite_image_url(raw, raw_base),
                };
                return format!("{}{}", head.as_str(), rewritten);
            }
            let head = caps.name("html_head").map_or("", |m| m.as_str());
            let quote = caps.name("quote").map_or("", |m| m.as_str());
            let path = caps.name("html_path").map_or("", |m| m.as_str());
            format!("{}{}{}", head, quote, rewrite_image_url(path, raw_base))
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://raw.githubusercontent.com/octo/hello/main/";

    #[test]
    fn test_markdown_images() {
        let text = "Intro\n![logo](./assets/logo.png \"Logo\")\n![b](/docs/b.gif)\n![c](c.jpg)";
        let expected = format!(
            "Intro\n![logo]({b}assets/logo.png \"Logo\")\n![b]({b}docs/b.gif)\n![c]({b}c.jpg)",
            b = BASE
        );
        assert_eq!(rewrite_image_paths(text, BASE), expected);
    }

    #[test]
    fn test_html_images() {
        let text = r#"<p align="center"><img width="200" src="./logo.svg" alt="x"></p>"#;
        let expected = format!(
            r#"<p align="center"><img width="200" src="{}logo.svg" alt="x"></p>"#,
            BASE
        );
        assert_eq!(rewrite_image_paths(text, BASE), expected);

        let single = "<img src='img/a.png'/>";
        assert_eq!(
            rewrite_image_paths(single, BASE),
            format!("<img src='{}img/a.png'/>", BASE)
        );
    }

    #[test]
    fn test_absolute_references_untouched() {
        let text = "![a](https://example.com/a.png) ![b](//cdn.example.com/b.png) \
                    ![c](#anchor) ![d](data:image/png;base64,AAAA) <img src=\"HTTP://X/y.png\">";
        assert_eq!(rewrite_image_paths(text, BASE), text);
    }

    #[test]
    fn test_links_are_not_images() {
        let text = "[docs](./docs/index.md)";
        assert_eq!(rewrite_image_paths(text, BASE), text);
    }

    #[test]
    fn test_single_pass_does_not_double_rewrite() {
        let once = rewrite_image_paths("![x](./a.png)", BASE);
        assert_eq!(once, format!("![x]({}a.png)", BASE));
        // Running again leaves absolute URLs alone.
        assert_eq!(rewrite_image_paths(&once, BASE), once);
    }

    #[test]
    fn test_angle_bracket_paths() {
        assert_eq!(
            rewrite_image_paths("![x](<my img.png>)", BASE),
            format!("![x](<{}my img.png>)", BASE)
        );
    }
}
