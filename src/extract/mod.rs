pub mod parse;
pub mod patterns;
pub mod text;
pub mod tree;

use crate::types::signals::{ClientSignals, Fidelity};
use patterns::{ElementQuery, LabelQuery, Marker, Matcher, PatternTable};
use tracing::debug;

pub use text::TextDocument;
pub use tree::TreeDocument;

/// Elements whose text is never visible.
pub(crate) const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// What an extraction backend must be able to answer about a document.
/// Both backends answer identically for the same markup.
pub trait Document {
    /// Visible text, whitespace collapsed. Regex matchers run over this.
    fn text(&self) -> &str;

    /// Case-insensitive containment; `phrase` is already lowercase.
    fn contains_phrase(&self, phrase: &str) -> bool;

    fn labeled_value(&self, query: &LabelQuery) -> Option<String>;

    /// Text runs of the first matching element, in document order.
    fn element_texts(&self, query: &ElementQuery) -> Vec<String>;

    fn has_marker(&self, marker: &Marker) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Regex over raw markup.
    Text,
    /// Parsed element tree.
    Tree,
}

pub fn extract(doc: &dyn Document, mode: Fidelity) -> ClientSignals {
    extract_with(doc, mode, patterns::standard())
}

pub fn extract_with(doc: &dyn Document, mode: Fidelity, table: &PatternTable) -> ClientSignals {
    let hiring_rate = first_parsed(&table.hiring_rate, doc, parse::parse_percent);
    let payment_verified = Some(table.payment_verified.iter().any(|marker| doc.has_marker(marker)));

    let signals = match mode {
        Fidelity::Page => ClientSignals {
            hiring_rate,
            payment_verified,
            last_seen: first_parsed(&table.last_seen, doc, |raw| Some(raw.to_string())),
            total_jobs: first_parsed(&table.total_jobs, doc, parse::parse_count),
            total_spending: first_parsed(&table.total_spending, doc, parse::parse_amount),
        },
        Fidelity::Card => ClientSignals {
            hiring_rate,
            payment_verified,
            last_seen: None,
            total_jobs: None,
            total_spending: first_parsed(&table.card_spending, doc, parse::parse_card_amount),
        },
    };
    debug!(?mode, ?signals, "extracted client signals");
    signals
}

/// Parses `markup` with the chosen backend and extracts signals. The parsed
/// tree is dropped before returning.
pub fn extract_html(markup: &str, backend: Backend, mode: Fidelity) -> ClientSignals {
    match backend {
        Backend::Text => extract(&TextDocument::new(markup), mode),
        Backend::Tree => extract(&TreeDocument::parse(markup), mode),
    }
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn first_parsed<T>(
    matchers: &[Matcher],
    doc: &dyn Document,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    matchers.iter().find_map(|matcher| {
        matcher
            .candidates(doc)
            .iter()
            .find_map(|raw| parse(raw))
    })
}
