//! Section-level page decomposition.
//!
//! Splits a page into labeled content sections using a tiered strategy:
//! semantic container tags first, then substantial top-level divs, then
//! the whole body. Each tier only runs when the previous one came up
//! empty, so a page always yields at least one section.

pub mod classify;
pub mod meta;

use crate::dom;
use crate::model::{Image, Link, Meta, Section, SectionContent, SectionKind};
use scraper::{ElementRef, Html, Selector};

/// Hard cap on the serialized markup stored per section.
pub const RAW_HTML_CAP: usize = 1000;

/// Minimum text length for a fallback div to count as a section.
pub const DIV_TEXT_THRESHOLD: usize = 50;

/// How many top-level divs the fallback tier considers.
pub const MAX_FALLBACK_DIVS: usize = 10;

/// Semantic container tags, in extraction priority order.
pub const SEMANTIC_TAGS: &[&str] = &[
    "header", "nav", "main", "section", "article", "aside", "footer",
];

/// Extraction strategies tried in sequence until one yields sections.
#[derive(Debug, Clone, Copy)]
enum Tier {
    /// Semantic container tags with non-empty text.
    Semantic,
    /// First few `body > div` elements with substantial text.
    TopDivs,
    /// The whole `<body>` as a single section.
    Body,
}

const TIERS: &[Tier] = &[Tier::Semantic, Tier::TopDivs, Tier::Body];

/// Meta plus sections extracted from one HTML document.
#[derive(Debug, Clone, Default)]
pub struct ExtractedPage {
    pub meta: Meta,
    pub sections: Vec<Section>,
}

/// Parse a page and extract metadata and sections in one pass.
///
/// This is synchronous on purpose: `scraper::Html` is not Send, so the
/// engine runs it inside `spawn_blocking` instead of holding parsed
/// documents across await points.
pub fn extract_page(html: &str, source_url: &str) -> ExtractedPage {
    let doc = Html::parse_document(html);
    ExtractedPage {
        meta: meta::extract_meta(&doc),
        sections: extract_sections(&doc, source_url),
    }
}

/// Extract content sections from a parsed document.
pub fn extract_sections(doc: &Html, source_url: &str) -> Vec<Section> {
    for tier in TIERS {
        let sections = collect_tier(*tier, doc, source_url);
        if !sections.is_empty() {
            return sections;
        }
    }
    vec![placeholder(source_url)]
}

fn collect_tier(tier: Tier, doc: &Html, source_url: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut index = 0usize;

    match tier {
        Tier::Semantic => {
            for tag in SEMANTIC_TAGS {
                let sel = Selector::parse(tag).unwrap();
                for el in doc.select(&sel) {
                    let section = build_section(el, tag, index, source_url);
                    if !section.content.text.trim().is_empty() {
                        sections.push(section);
                        index += 1;
                    }
                }
            }
        }
        Tier::TopDivs => {
            let sel = Selector::parse("body > div").unwrap();
            for el in doc.select(&sel).take(MAX_FALLBACK_DIVS) {
                let section = build_section(el, "section", index, source_url);
                if section.content.text.chars().count() > DIV_TEXT_THRESHOLD {
                    sections.push(section);
                    index += 1;
                }
            }
        }
        Tier::Body => {
            let sel = Selector::parse("body").unwrap();
            if let Some(body) = doc.select(&sel).next() {
                sections.push(build_section(body, "section", 0, source_url));
            }
        }
    }

    sections
}

/// Build one section from a candidate element.
fn build_section(el: ElementRef<'_>, source_tag: &str, index: usize, source_url: &str) -> Section {
    let heading_sel = Selector::parse("h1, h2, h3, h4, h5, h6").unwrap();
    let mut headings = Vec::new();
    for h in el.select(&heading_sel) {
        let t = dom::flatten_text(h);
        if !t.is_empty() {
            headings.push(t);
        }
    }

    let text = dom::flatten_text(el);

    let link_sel = Selector::parse("a").unwrap();
    let mut links = Vec::new();
    for a in el.select(&link_sel) {
        let href = a.value().attr("href").unwrap_or("");
        if href.is_empty() {
            continue;
        }
        // Unresolvable hrefs are dropped rather than emitted relative.
        if let Some(abs) = dom::resolve_url(source_url, href) {
            links.push(Link {
                text: dom::flatten_text(a),
                href: abs,
            });
        }
    }

    let img_sel = Selector::parse("img").unwrap();
    let mut images = Vec::new();
    for img in el.select(&img_sel) {
        let src = img
            .value()
            .attr("src")
            .filter(|s| !s.is_empty())
            .or_else(|| img.value().attr("data-src").filter(|s| !s.is_empty()));
        if let Some(src) = src {
            if let Some(abs) = dom::resolve_url(source_url, src) {
                images.push(Image {
                    src: abs,
                    alt: img.value().attr("alt").unwrap_or("").to_string(),
                });
            }
        }
    }

    let list_sel = Selector::parse("ul, ol").unwrap();
    let li_sel = Selector::parse("li").unwrap();
    let mut lists = Vec::new();
    for ul in el.select(&list_sel) {
        let items: Vec<String> = ul
            .select(&li_sel)
            .map(dom::flatten_text)
            .filter(|t| !t.is_empty())
            .collect();
        if !items.is_empty() {
            lists.push(items);
        }
    }

    let table_sel = Selector::parse("table").unwrap();
    let tr_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("td, th").unwrap();
    let mut tables = Vec::new();
    for table in el.select(&table_sel) {
        let mut rows = Vec::new();
        for tr in table.select(&tr_sel) {
            let cells: Vec<String> = tr.select(&cell_sel).map(dom::flatten_text).collect();
            if !cells.is_empty() {
                rows.push(cells);
            }
        }
        if !rows.is_empty() {
            tables.push(rows);
        }
    }

    let kind = classify::classify(source_tag, &text);
    let label = classify::label_for(&headings, &text, kind);

    let full_html = el.html();
    let total_chars = full_html.chars().count();
    let (raw_html, truncated) = if total_chars > RAW_HTML_CAP {
        let mut capped: String = full_html.chars().take(RAW_HTML_CAP).collect();
        capped.push_str("...");
        (capped, true)
    } else {
        (full_html, false)
    };

    Section {
        id: format!("{}-{}", kind.as_str(), index),
        kind,
        label,
        source_url: source_url.to_string(),
        content: SectionContent {
            headings,
            text,
            links,
            images,
            lists,
            tables,
        },
        raw_html,
        truncated,
    }
}

/// Fallback section emitted when the document has no body at all.
fn placeholder(source_url: &str) -> Section {
    Section {
        id: "unknown-0".to_string(),
        kind: SectionKind::Unknown,
        label: "Content".to_string(),
        source_url: source_url.to_string(),
        content: SectionContent::default(),
        raw_html: String::new(),
        truncated: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/page";

    #[test]
    fn test_semantic_tier_priority_order() {
        // The <section> appears before the <header> in the markup, but
        // header is a higher-priority tag and is extracted first.
        let doc = Html::parse_document(
            "<html><body>\
             <section><p>middle content here</p></section>\
             <header><h1>Top</h1></header>\
             </body></html>",
        );
        let sections = extract_sections(&doc, URL);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].kind, SectionKind::Hero);
        assert_eq!(sections[0].id, "hero-0");
        assert_eq!(sections[1].id, "section-1");
    }

    #[test]
    fn test_empty_semantic_sections_dropped() {
        let doc = Html::parse_document(
            "<html><body>\
             <section><p>first</p></section>\
             <section>   </section>\
             <section><p>third</p></section>\
             </body></html>",
        );
        let sections = extract_sections(&doc, URL);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].id, "section-0");
        assert_eq!(sections[1].id, "section-1");
        assert_eq!(sections[1].content.text, "third");
    }

    #[test]
    fn test_div_fallback_requires_substantial_text() {
        let doc = Html::parse_document(
            "<html><body>\
             <div>tiny</div>\
             <div>this div carries enough text to clear the fifty character bar</div>\
             </body></html>",
        );
        let sections = extract_sections(&doc, URL);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].content.text.starts_with("this div carries"));
    }

    #[test]
    fn test_body_fallback_when_nothing_else_matches() {
        let doc = Html::parse_document("<html><body><p>short</p></body></html>");
        let sections = extract_sections(&doc, URL);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].id, "section-0");
        assert_eq!(sections[0].content.text, "short");
    }

    #[test]
    fn test_raw_html_cap() {
        let long_text = "x".repeat(2000);
        let doc = Html::parse_document(&format!(
            "<html><body><section><p>{long_text}</p></section></body></html>"
        ));
        let sections = extract_sections(&doc, URL);
        let s = &sections[0];
        assert!(s.truncated);
        // 1000 chars of markup plus the ellipsis marker
        assert_eq!(s.raw_html.chars().count(), RAW_HTML_CAP + 3);
        assert!(s.raw_html.ends_with("..."));
    }

    #[test]
    fn test_short_raw_html_not_truncated() {
        let doc = Html::parse_document(
            "<html><body><section><p>brief</p></section></body></html>",
        );
        let sections = extract_sections(&doc, URL);
        assert!(!sections[0].truncated);
        assert!(sections[0].raw_html.contains("<p>brief</p>"));
    }

    #[test]
    fn test_placeholder_shape() {
        let p = placeholder(URL);
        assert_eq!(p.id, "unknown-0");
        assert_eq!(p.kind, SectionKind::Unknown);
        assert_eq!(p.label, "Content");
        assert!(p.raw_html.is_empty());
        assert!(!p.truncated);
    }

    #[test]
    fn test_extract_page_combines_meta_and_sections() {
        let page = extract_page(
            "<html lang=\"fr\"><head><title>T</title></head>\
             <body><article><p>un peu de texte</p></article></body></html>",
            URL,
        );
        assert_eq!(page.meta.title, "T");
        assert_eq!(page.meta.language, "fr");
        assert_eq!(page.sections.len(), 1);
    }
}
