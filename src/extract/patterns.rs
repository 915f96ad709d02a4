//! Ordered matcher lists per signal. The source markup changes without
//! notice, so each signal gets several candidates tried in order and the
//! first one yielding a parseable value wins.

use super::Document;
use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;
use thiserror::Error;

/// Whitespace, tags and `&nbsp;` allowed between the words of a label.
const GAP: &str = r"(?:\s|&nbsp;|<[^>]*>)*";

static STANDARD: LazyLock<PatternTable> =
    LazyLock::new(|| PatternTable::standard().expect("built-in patterns compile"));

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("invalid selector `{0}`")]
    Selector(String),
}

fn selector(css: &str) -> Result<Selector, PatternError> {
    Selector::parse(css).map_err(|_| PatternError::Selector(css.to_string()))
}

/// `class="..."` attribute containing `class` as a whole token.
fn class_attr(class: &str) -> String {
    format!(
        r#"class\s*=\s*["'](?:[^"']*\s)?{}(?:\s[^"']*)?["']"#,
        regex::escape(class)
    )
}

/// Opening tag of any element whose attributes match `attrs`.
fn open_tag(attrs: &str) -> String {
    format!(r"(?i)<[A-Za-z][A-Za-z0-9-]*\b[^<>]*?{attrs}[^<>]*>")
}

/// A block whose title element names the value next to it, e.g.
/// `<div class="ca-item"><div class="title">..</div><div class="value">..</div></div>`.
#[derive(Debug, Clone)]
pub struct LabelQuery {
    pub title: String,
    pub container: Selector,
    pub title_el: Selector,
    pub value_el: Selector,
    pub container_open: Regex,
    pub title_open: Regex,
    pub value_open: Regex,
}

impl LabelQuery {
    pub fn new(
        title: &str,
        container_class: &str,
        title_class: &str,
        value_class: &str,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            title: title.to_string(),
            container: selector(&format!(".{container_class}"))?,
            title_el: selector(&format!(".{title_class}"))?,
            value_el: selector(&format!(".{value_class}"))?,
            container_open: Regex::new(&open_tag(&class_attr(container_class)))?,
            title_open: Regex::new(&open_tag(&class_attr(title_class)))?,
            value_open: Regex::new(&open_tag(&class_attr(value_class)))?,
        })
    }
}

/// Text runs inside the element carrying `attribute="value"`, tried in
/// document order.
#[derive(Debug, Clone)]
pub struct ElementQuery {
    pub selector: Selector,
    pub open: Regex,
}

impl ElementQuery {
    pub fn new(attribute: &str, value: &str) -> Result<Self, PatternError> {
        let attrs = format!(
            r#"\b{}\s*=\s*["']{}["']"#,
            regex::escape(attribute),
            regex::escape(value),
        );
        Ok(Self {
            selector: selector(&format!("[{attribute}=\"{value}\"]"))?,
            open: Regex::new(&open_tag(&attrs))?,
        })
    }
}

/// Presence-only evidence for a boolean signal.
#[derive(Debug, Clone)]
pub enum Marker {
    /// Case-insensitive text phrase, stored lowercased.
    Phrase(String),
    Attribute { selector: Selector, markup: Regex },
    Class { selector: Selector, markup: Regex },
}

impl Marker {
    pub fn phrase(phrase: &str) -> Self {
        Self::Phrase(phrase.to_lowercase())
    }

    pub fn attribute(name: &str, value: &str) -> Result<Self, PatternError> {
        Ok(Self::Attribute {
            selector: selector(&format!("[{name}=\"{value}\"]"))?,
            markup: Regex::new(&format!(
                r#"(?i)\b{}\s*=\s*["']{}["']"#,
                regex::escape(name),
                regex::escape(value)
            ))?,
        })
    }

    pub fn class(name: &str) -> Result<Self, PatternError> {
        Ok(Self::Class {
            selector: selector(&format!(".{name}"))?,
            markup: Regex::new(&class_attr(name))?,
        })
    }
}

#[derive(Debug, Clone)]
pub enum Matcher {
    /// Regex over the document text; the capture groups are concatenated.
    Pattern(Regex),
    Labeled(LabelQuery),
    /// Lowercase keyword; yields the keyword itself when present.
    Keyword(String),
    Element(ElementQuery),
}

impl Matcher {
    pub fn pattern(pattern: &str) -> Result<Self, PatternError> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    pub fn keyword(keyword: &str) -> Self {
        Self::Keyword(keyword.to_lowercase())
    }

    /// Raw values this matcher finds, best first. Only element queries
    /// can yield more than one.
    pub fn candidates(&self, doc: &dyn Document) -> Vec<String> {
        match self {
            Self::Pattern(re) => re
                .captures(doc.text())
                .map(|caps| {
                    caps.iter()
                        .skip(1)
                        .flatten()
                        .map(|group| group.as_str())
                        .collect::<String>()
                })
                .filter(|joined| !joined.is_empty())
                .into_iter()
                .collect(),
            Self::Labeled(query) => doc
                .labeled_value(query)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .into_iter()
                .collect(),
            Self::Keyword(keyword) => doc
                .contains_phrase(keyword)
                .then(|| keyword.clone())
                .into_iter()
                .collect(),
            Self::Element(query) => doc.element_texts(query),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PatternTable {
    pub hiring_rate: Vec<Matcher>,
    pub payment_verified: Vec<Marker>,
    pub last_seen: Vec<Matcher>,
    pub total_jobs: Vec<Matcher>,
    pub total_spending: Vec<Matcher>,
    pub card_spending: Vec<Matcher>,
}

impl PatternTable {
    /// Patterns for the current job-page and search-card markup.
    pub fn standard() -> Result<Self, PatternError> {
        Ok(Self {
            hiring_rate: vec![
                Matcher::pattern(&format!(r"(?i)\b(\d{{1,3}}){GAP}%{GAP}hire{GAP}rate"))?,
                Matcher::pattern(&format!(r"(?i)hire{GAP}rate{GAP}:?{GAP}(\d{{1,3}}){GAP}%"))?,
            ],
            payment_verified: vec![
                Marker::phrase("Payment method verified"),
                Marker::phrase("payment verified"),
                Marker::attribute("data-test", "payment-verified")?,
                Marker::class("payment-verified-icon")?,
            ],
            last_seen: vec![
                Matcher::Labeled(LabelQuery::new(
                    "Last viewed by client",
                    "ca-item",
                    "title",
                    "value",
                )?),
                Matcher::keyword("yesterday"),
                Matcher::keyword("minutes ago"),
                Matcher::keyword("hours ago"),
                Matcher::keyword("days ago"),
            ],
            total_jobs: vec![
                Matcher::pattern(&format!(r"(?i)\b(\d[\d,]*){GAP}jobs?{GAP}posted"))?,
                Matcher::pattern(&format!(r"(?i)posted{GAP}(\d[\d,]*){GAP}jobs?\b"))?,
                Matcher::pattern(&format!(r"(?i)jobs?{GAP}posted{GAP}:?{GAP}(\d[\d,]*)"))?,
            ],
            total_spending: vec![
                Matcher::pattern(&format!(
                    r"(?i)\$\s*(\d[\d,]*(?:\.\d+)?)\s*([KMB])?\b{GAP}total{GAP}spent"
                ))?,
                Matcher::pattern(&format!(
                    r"(?i)total{GAP}spent{GAP}:?{GAP}\$\s*(\d[\d,]*(?:\.\d+)?)\s*([KMB])?\b"
                ))?,
            ],
            card_spending: vec![Matcher::Element(ElementQuery::new(
                "data-qa",
                "client-spend",
            )?)],
        })
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        STANDARD.clone()
    }
}

pub fn standard() -> &'static PatternTable {
    &STANDARD
}
