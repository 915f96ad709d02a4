use super::patterns::{ElementQuery, LabelQuery, Marker};
use super::{collapse_whitespace, Document, SKIPPED_ELEMENTS};
use regex::Regex;
use std::sync::LazyLock;

/// Comments, tags, text runs, and a bare `<` that opens nothing.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<(/?)([A-Za-z][A-Za-z0-9-]*)\b[^<>]*>|[^<]+|<").unwrap()
});

const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Raw markup scanned with regular expressions. Regex matchers and phrase
/// checks see the visible text: tags stripped, entities decoded, script
/// bodies dropped, whitespace collapsed.
pub struct TextDocument<'a> {
    markup: &'a str,
    text: String,
    lowered: String,
}

impl<'a> TextDocument<'a> {
    pub fn new(markup: &'a str) -> Self {
        let text = text_runs(markup, 0, false).runs.join(" ");
        let lowered = text.to_lowercase();
        Self {
            markup,
            text,
            lowered,
        }
    }
}

impl Document for TextDocument<'_> {
    fn text(&self) -> &str {
        &self.text
    }

    fn contains_phrase(&self, phrase: &str) -> bool {
        self.lowered.contains(phrase)
    }

    fn labeled_value(&self, query: &LabelQuery) -> Option<String> {
        query.container_open.find_iter(self.markup).find_map(|open| {
            let end = text_runs(self.markup, open.end(), true).end;
            let item = &self.markup[open.end()..end];

            let title = query.title_open.find(item)?;
            if !inner_text(item, title.end()).contains(&query.title) {
                return None;
            }
            query
                .value_open
                .find(item)
                .map(|value| inner_text(item, value.end()))
        })
    }

    fn element_texts(&self, query: &ElementQuery) -> Vec<String> {
        query
            .open
            .find(self.markup)
            .map(|open| text_runs(self.markup, open.end(), true).runs)
            .unwrap_or_default()
    }

    fn has_marker(&self, marker: &Marker) -> bool {
        match marker {
            Marker::Phrase(phrase) => self.contains_phrase(phrase),
            Marker::Attribute { markup, .. } | Marker::Class { markup, .. } => {
                markup.is_match(self.markup)
            }
        }
    }
}

struct Walk {
    runs: Vec<String>,
    /// Byte offset just past the closing tag, or the end of input.
    end: usize,
}

/// Collects visible text runs from `from`. When `scoped`, `from` is just
/// inside an element and the walk stops at that element's closing tag.
fn text_runs(markup: &str, from: usize, scoped: bool) -> Walk {
    let mut runs = Vec::new();
    let mut depth = 1usize;
    let mut skipping: Option<String> = None;

    for caps in TOKEN_RE.captures_iter(&markup[from..]) {
        let Some(token) = caps.get(0) else {
            continue;
        };
        let Some(name) = caps.get(2) else {
            if skipping.is_none() && !token.as_str().starts_with("<!--") {
                let run = collapse_whitespace(&decode_entities(token.as_str()));
                if !run.is_empty() {
                    runs.push(run);
                }
            }
            continue;
        };

        let name = name.as_str().to_ascii_lowercase();
        let closing = caps.get(1).is_some_and(|slash| !slash.as_str().is_empty());
        let self_closing = token.as_str().ends_with("/>");

        if let Some(skipped) = &skipping {
            if closing && *skipped == name {
                skipping = None;
            }
            continue;
        }
        if closing {
            if scoped {
                depth -= 1;
                if depth == 0 {
                    return Walk {
                        runs,
                        end: from + token.end(),
                    };
                }
            }
        } else if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
            continue;
        } else if SKIPPED_ELEMENTS.contains(&name.as_str()) {
            skipping = Some(name);
        } else if scoped {
            depth += 1;
        }
    }

    Walk {
        runs,
        end: markup.len(),
    }
}

fn inner_text(markup: &str, from: usize) -> String {
    text_runs(markup, from, true).runs.join(" ")
}

/// The handful of entities that show up in client panels.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
