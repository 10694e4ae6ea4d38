//! Section classification and labeling.
//!
//! Both functions are deterministic over their inputs: the same tag and
//! content always produce the same kind and label.

use crate::model::SectionKind;

/// Keywords whose presence in section text marks a pricing block.
const PRICING_HINTS: &[&str] = &["pricing", "price", "$", "plan"];

/// Keywords whose presence in section text marks an FAQ block.
const FAQ_HINTS: &[&str] = &["faq", "question", "answer"];

/// Keywords whose presence in section text marks a grid or gallery block.
const GRID_HINTS: &[&str] = &["grid", "gallery"];

/// Classify a section from its source tag, falling back to content keywords.
///
/// `header`, `nav`, and `footer` map directly; everything else is decided
/// by scanning the lowercased section text.
pub fn classify(source_tag: &str, text: &str) -> SectionKind {
    match source_tag {
        "header" => return SectionKind::Hero,
        "nav" => return SectionKind::Nav,
        "footer" => return SectionKind::Footer,
        _ => {}
    }

    let text_lower = text.to_lowercase();
    if PRICING_HINTS.iter().any(|k| text_lower.contains(k)) {
        return SectionKind::Pricing;
    }
    if FAQ_HINTS.iter().any(|k| text_lower.contains(k)) {
        return SectionKind::Faq;
    }
    if GRID_HINTS.iter().any(|k| text_lower.contains(k)) {
        return SectionKind::Grid;
    }

    SectionKind::Section
}

/// Derive a short label: first heading, else the text's first seven words,
/// else the capitalized kind name.
pub fn label_for(headings: &[String], text: &str, kind: SectionKind) -> String {
    if let Some(first) = headings.first() {
        return first.clone();
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if !words.is_empty() {
        let mut label = words.iter().take(7).copied().collect::<Vec<_>>().join(" ");
        if words.len() > 7 {
            label.push_str("...");
        }
        return label;
    }

    capitalize(kind.as_str())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_map_wins_over_keywords() {
        // A footer mentioning prices is still a footer.
        assert_eq!(
            classify("footer", "see our pricing plans"),
            SectionKind::Footer
        );
        assert_eq!(classify("header", "welcome"), SectionKind::Hero);
        assert_eq!(classify("nav", "home about"), SectionKind::Nav);
    }

    #[test]
    fn test_keyword_classification() {
        assert_eq!(
            classify("section", "Choose a plan that fits"),
            SectionKind::Pricing
        );
        assert_eq!(
            classify("section", "Frequently asked QUESTIONS"),
            SectionKind::Faq
        );
        assert_eq!(
            classify("div", "our photo gallery"),
            SectionKind::Grid
        );
        assert_eq!(
            classify("article", "a plain story about nothing"),
            SectionKind::Section
        );
    }

    #[test]
    fn test_dollar_sign_marks_pricing() {
        assert_eq!(classify("section", "only $9.99 today"), SectionKind::Pricing);
    }

    #[test]
    fn test_label_prefers_first_heading() {
        let headings = vec!["Main Title".to_string(), "Sub".to_string()];
        assert_eq!(
            label_for(&headings, "some other text", SectionKind::Section),
            "Main Title"
        );
    }

    #[test]
    fn test_label_truncates_to_seven_words() {
        let text = "one two three four five six seven eight nine";
        assert_eq!(
            label_for(&[], text, SectionKind::Section),
            "one two three four five six seven..."
        );
    }

    #[test]
    fn test_label_short_text_kept_whole() {
        assert_eq!(
            label_for(&[], "just five words right here", SectionKind::Section),
            "just five words right here"
        );
    }

    #[test]
    fn test_label_falls_back_to_kind_name() {
        assert_eq!(label_for(&[], "", SectionKind::Section), "Section");
        assert_eq!(label_for(&[], "   ", SectionKind::Unknown), "Unknown");
    }

    #[test]
    fn test_classify_idempotent() {
        let a = classify("section", "price list");
        let b = classify("section", "price list");
        assert_eq!(a, b);
    }
}
