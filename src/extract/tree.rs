use super::patterns::{ElementQuery, LabelQuery, Marker};
use super::{collapse_whitespace, Document, SKIPPED_ELEMENTS};
use scraper::{ElementRef, Html};

/// Parsed element tree. Regex matchers run over the visible text with
/// whitespace collapsed; structural queries use CSS selectors.
pub struct TreeDocument {
    html: Html,
    text: String,
    lowered: String,
}

impl TreeDocument {
    pub fn parse(markup: &str) -> Self {
        let html = Html::parse_document(markup);
        let text = visible_text(&html);
        let lowered = text.to_lowercase();
        Self {
            html,
            text,
            lowered,
        }
    }
}

impl Document for TreeDocument {
    fn text(&self) -> &str {
        &self.text
    }

    fn contains_phrase(&self, phrase: &str) -> bool {
        self.lowered.contains(phrase)
    }

    fn labeled_value(&self, query: &LabelQuery) -> Option<String> {
        self.html.select(&query.container).find_map(|item| {
            let title = item.select(&query.title_el).next()?;
            if !inner_text(title).contains(&query.title) {
                return None;
            }
            item.select(&query.value_el).next().map(inner_text)
        })
    }

    fn element_texts(&self, query: &ElementQuery) -> Vec<String> {
        self.html
            .select(&query.selector)
            .next()
            .map(text_runs)
            .unwrap_or_default()
    }

    fn has_marker(&self, marker: &Marker) -> bool {
        match marker {
            Marker::Phrase(phrase) => self.contains_phrase(phrase),
            Marker::Attribute { selector, .. } | Marker::Class { selector, .. } => {
                self.html.select(selector).next().is_some()
            }
        }
    }
}

/// Non-empty text nodes under `element` outside script-like elements, each
/// with whitespace collapsed.
fn text_runs(element: ElementRef<'_>) -> Vec<String> {
    element
        .descendants()
        .filter(|node| {
            !node
                .parent()
                .and_then(|parent| parent.value().as_element().map(|element| element.name()))
                .is_some_and(|name| SKIPPED_ELEMENTS.contains(&name))
        })
        .filter_map(|node| node.value().as_text().map(|text| collapse_whitespace(text)))
        .filter(|run| !run.is_empty())
        .collect()
}

fn inner_text(element: ElementRef<'_>) -> String {
    text_runs(element).join(" ")
}

fn visible_text(html: &Html) -> String {
    text_runs(html.root_element()).join(" ")
}
