/// One recommendation block extracted from the LLM completion.
///
/// Only the title is guaranteed; rating and explanation stay unset when the
/// model omitted or mangled those lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntry {
    pub title: String,
    pub rating: Option<f64>,
    pub explanation: Option<String>,
}

impl ParsedEntry {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            rating: None,
            explanation: None,
        }
    }
}

/// Scans the completion line by line and folds it into an ordered entry
/// list. A `MOVIE <n>:` marker closes the previous entry and opens the next;
/// `Rating:` and `Explanation:` lines fill the open entry (first occurrence
/// wins). Everything else, including prose between blocks, is skipped.
/// Never fails: unparseable text just yields fewer or emptier entries.
pub fn parse(text: &str) -> Vec<ParsedEntry> {
    let mut entries = Vec::new();
    let mut open: Option<ParsedEntry> = None;

    for line in text.lines() {
        let line = line.trim();

        if let Some(title) = title_marker(line) {
            if let Some(entry) = open.take() {
                entries.push(entry);
            }
            open = Some(ParsedEntry::new(title));
            continue;
        }

        let Some(entry) = open.as_mut() else {
            continue;
        };

        if let Some(value) = rating_value(line) {
            if entry.rating.is_none() {
                entry.rating = Some(value);
            }
            continue;
        }

        if let Some(text) = explanation_text(line) {
            if entry.explanation.is_none() {
                entry.explanation = Some(text.to_string());
            }
        }
    }

    if let Some(entry) = open.take() {
        entries.push(entry);
    }
    entries
}

/// Splits a `MOVIE <n>:` marker off the front of a line and returns the
/// remainder, which may be empty. The marker is case-insensitive and needs
/// whitespace between the word and the number, digits flush against the
/// colon.
pub(crate) fn split_marker(line: &str) -> Option<&str> {
    let rest = strip_ci_prefix(line.trim_start(), "movie")?;
    let after_ws = rest.trim_start();
    if after_ws.len() == rest.len() {
        return None;
    }
    let digits = after_ws.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    after_ws[digits..].strip_prefix(':')
}

fn title_marker(line: &str) -> Option<&str> {
    let title = split_marker(line)?.trim();
    // A marker with nothing after the colon is not a title line.
    (!title.is_empty()).then_some(title)
}

fn rating_value(line: &str) -> Option<f64> {
    let rest = strip_ci_prefix(line.trim_start(), "rating:")?;
    let (number, tail) = rest.trim_start().split_once('/')?;
    if !number.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    if !tail.starts_with("10") {
        return None;
    }
    let value: f64 = number.parse().ok()?;
    (0.0..=10.0).contains(&value).then_some(value)
}

fn explanation_text(line: &str) -> Option<&str> {
    let text = strip_ci_prefix(line.trim_start(), "explanation:")?.trim();
    (!text.is_empty()).then_some(text)
}

fn strip_ci_prefix<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}
