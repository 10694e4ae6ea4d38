//! Page-level metadata extraction.

use crate::dom;
use crate::model::Meta;
use scraper::{ElementRef, Html, Selector};

/// First element matching a selector, or None for no match (or an
/// unparseable selector, which the fixed selectors here never are).
fn select_first<'a>(doc: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel).next()
}

/// Extract title, description, language, and canonical URL.
///
/// OpenGraph values are used only when the corresponding element is
/// absent entirely; an empty `<title></title>` stays empty. Language
/// comes from the `<html lang>` attribute, defaulting to "en".
pub fn extract_meta(doc: &Html) -> Meta {
    let mut meta = Meta::default();

    meta.title = match select_first(doc, "title") {
        Some(el) => dom::flatten_text(el),
        None => select_first(doc, r#"meta[property="og:title"]"#)
            .and_then(|el| el.value().attr("content"))
            .unwrap_or("")
            .to_string(),
    };

    meta.description = match select_first(doc, r#"meta[name="description"]"#) {
        Some(el) => el.value().attr("content").unwrap_or("").to_string(),
        None => select_first(doc, r#"meta[property="og:description"]"#)
            .and_then(|el| el.value().attr("content"))
            .unwrap_or("")
            .to_string(),
    };

    if let Some(lang) = select_first(doc, "html").and_then(|el| el.value().attr("lang")) {
        meta.language = lang.to_string();
    }

    meta.canonical = select_first(doc, r#"link[rel="canonical"]"#)
        .and_then(|el| el.value().attr("href"))
        .map(str::to_string);

    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_meta() {
        let doc = Html::parse_document(
            r#"<html lang="de"><head>
            <title>  My   Page </title>
            <meta name="description" content="A fine page" />
            <link rel="canonical" href="https://example.com/page" />
            </head><body></body></html>"#,
        );
        let meta = extract_meta(&doc);
        assert_eq!(meta.title, "My Page");
        assert_eq!(meta.description, "A fine page");
        assert_eq!(meta.language, "de");
        assert_eq!(meta.canonical.as_deref(), Some("https://example.com/page"));
    }

    #[test]
    fn test_og_fallbacks_when_elements_absent() {
        let doc = Html::parse_document(
            r#"<html><head>
            <meta property="og:title" content="OG Title" />
            <meta property="og:description" content="OG description" />
            </head><body></body></html>"#,
        );
        let meta = extract_meta(&doc);
        assert_eq!(meta.title, "OG Title");
        assert_eq!(meta.description, "OG description");
    }

    #[test]
    fn test_title_wins_over_og() {
        let doc = Html::parse_document(
            r#"<html><head>
            <title>Real Title</title>
            <meta property="og:title" content="OG Title" />
            </head><body></body></html>"#,
        );
        let meta = extract_meta(&doc);
        assert_eq!(meta.title, "Real Title");
    }

    #[test]
    fn test_empty_title_element_stays_empty() {
        // The title element is present, so og:title does not apply.
        let doc = Html::parse_document(
            r#"<html><head>
            <title></title>
            <meta property="og:title" content="OG Title" />
            </head><body></body></html>"#,
        );
        let meta = extract_meta(&doc);
        assert_eq!(meta.title, "");
    }

    #[test]
    fn test_empty_description_element_stays_empty() {
        let doc = Html::parse_document(
            r#"<html><head>
            <meta name="description" content="" />
            <meta property="og:description" content="OG description" />
            </head><body></body></html>"#,
        );
        let meta = extract_meta(&doc);
        assert_eq!(meta.description, "");
    }

    #[test]
    fn test_defaults_on_bare_page() {
        let doc = Html::parse_document("<html><body><p>x</p></body></html>");
        let meta = extract_meta(&doc);
        assert!(meta.title.is_empty());
        assert!(meta.description.is_empty());
        assert_eq!(meta.language, "en");
        assert!(meta.canonical.is_none());
    }
}
