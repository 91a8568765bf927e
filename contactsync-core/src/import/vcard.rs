//! vCard (contact card text) importer.
//!
//! Parses `.vcf` text into canonical records. Parsing is lenient: lines that
//! are not recognized properties are ignored and a card without a usable name
//! is dropped. Only unreadable input is an error.
//!
//! Name resolution per card:
//! 1. `FN` if present and non-empty
//! 2. otherwise `N` as "given family", skipping empty components
//!
//! The first non-empty `EMAIL` and `TEL` values win.

use std::path::PathBuf;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, instrument};

use crate::error::{ImportError, ImportResult};
use crate::models::ContactRecord;

use super::traits::{ContactSource, SourceKind, read_import_file};

/// Property name with an optional group prefix, e.g. `item1.EMAIL`
static PROPERTY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9-]+\.)?([A-Za-z0-9-]+)").expect("valid property name regex")
});

const BEGIN_MARKER: &str = "BEGIN:VCARD";
const END_MARKER: &str = "END:VCARD";

enum CardInput {
    Text(String),
    File(PathBuf),
}

/// Importer for vCard text or `.vcf` files
pub struct CardTextImporter {
    input: CardInput,
}

impl CardTextImporter {
    /// Creates an importer over in-memory card text
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            input: CardInput::Text(text.into()),
        }
    }

    /// Creates an importer that reads a `.vcf` file
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            input: CardInput::File(path.into()),
        }
    }

    /// Parses every card block in `text`.
    ///
    /// Never fails; cards without a name are skipped.
    #[must_use]
    pub fn parse(text: &str) -> Vec<ContactRecord> {
        let lines = unfold_lines(text);
        let mut records = Vec::new();
        let mut current: Option<CardFields> = None;

        for line in &lines {
            let trimmed = line.trim();
            if trimmed.eq_ignore_ascii_case(BEGIN_MARKER) {
                if let Some(card) = current.replace(CardFields::default()) {
                    records.extend(card.into_record());
                }
                continue;
            }
            if trimmed.eq_ignore_ascii_case(END_MARKER) {
                if let Some(card) = current.take() {
                    records.extend(card.into_record());
                }
                continue;
            }
            if let Some(card) = current.as_mut() {
                card.absorb(trimmed);
            }
        }

        // Unterminated last card
        if let Some(card) = current {
            records.extend(card.into_record());
        }

        records
    }
}

#[async_trait]
impl ContactSource for CardTextImporter {
    fn kind(&self) -> SourceKind {
        SourceKind::CardText
    }

    #[instrument(skip(self), fields(source = "card_text"))]
    async fn produce(&self) -> ImportResult<Vec<ContactRecord>> {
        let source_name = SourceKind::CardText.display_name();
        let records = match &self.input {
            CardInput::Text(text) => Self::parse(text),
            CardInput::File(path) => Self::parse(&read_import_file(path, source_name).await?),
        };

        debug!(count = records.len(), "Parsed contact cards");
        if records.is_empty() {
            return Err(ImportError::empty(source_name));
        }
        Ok(records)
    }
}

/// Fields collected while scanning one card
#[derive(Debug, Default)]
struct CardFields {
    formatted_name: Option<String>,
    structured_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

impl CardFields {
    fn absorb(&mut self, line: &str) {
        let Some((name, value)) = split_property(line) else {
            return;
        };

        match name.to_ascii_uppercase().as_str() {
            "FN" => set_once(&mut self.formatted_name, unescape(value)),
            "N" => set_once(&mut self.structured_name, structured_display_name(value)),
            "EMAIL" => set_once(&mut self.email, unescape(value)),
            "TEL" => set_once(&mut self.phone, strip_tel_uri(&unescape(value))),
            _ => {}
        }
    }

    fn into_record(self) -> Option<ContactRecord> {
        let name = self.formatted_name.or(self.structured_name)?;
        Some(
            ContactRecord::new(name)?
                .with_email(self.email)
                .with_phone(self.phone),
        )
    }
}

/// Stores `value` only if nothing non-empty was stored before
fn set_once(slot: &mut Option<String>, value: String) {
    let value = value.trim();
    if slot.is_none() && !value.is_empty() {
        *slot = Some(value.to_string());
    }
}

/// Joins physical lines folded per RFC 6350 (continuations start with
/// a space or tab).
///
/// Pasted text is often indented as a whole; the indentation in front of
/// the first `BEGIN:VCARD` is removed from every line before unfolding.
fn unfold_lines(text: &str) -> Vec<String> {
    let indent = text
        .lines()
        .find_map(|line| {
            let body = line.trim_start();
            body.get(..BEGIN_MARKER.len())
                .filter(|head| head.eq_ignore_ascii_case(BEGIN_MARKER))
                .map(|_| &line[..line.len() - body.len()])
        })
        .unwrap_or("");

    let mut lines: Vec<String> = Vec::new();
    for raw in text.lines() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let raw = raw.strip_prefix(indent).unwrap_or(raw);
        match (raw.strip_prefix([' ', '\t']), lines.last_mut()) {
            (Some(continuation), Some(previous)) => previous.push_str(continuation),
            _ => lines.push(raw.to_string()),
        }
    }
    lines
}

/// Splits `NAME;PARAMS:value` into the bare property name and its value.
///
/// Colons inside quoted parameter values do not end the property head.
fn split_property(line: &str) -> Option<(&str, &str)> {
    let name = PROPERTY_NAME.captures(line)?.get(1)?.as_str();

    let mut in_quotes = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => return Some((name, &line[idx + 1..])),
            _ => {}
        }
    }
    None
}

/// Builds "given family" from an `N` value (`family;given;additional;prefix;suffix`)
fn structured_display_name(value: &str) -> String {
    let components = split_unescaped(value, ';');
    let family = components.first().map(|c| unescape(c)).unwrap_or_default();
    let given = components.get(1).map(|c| unescape(c)).unwrap_or_default();

    [given.trim(), family.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits on `separator` unless it is backslash-escaped
fn split_unescaped(value: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (idx, ch) in value.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == separator {
            parts.push(&value[start..idx]);
            start = idx + ch.len_utf8();
        }
    }
    parts.push(&value[start..]);
    parts
}

/// Decodes vCard text escapes (`\,` `\;` `\n` `\\`)
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// vCard 4 may encode phones as `tel:` URIs
fn strip_tel_uri(value: &str) -> String {
    let trimmed = value.trim();
    match trimmed.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("tel:") => trimmed[4..].to_string(),
        _ => trimmed.to_string(),
    }
}
