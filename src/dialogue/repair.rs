//! Validation and repair of model output.
//!
//! Models rarely follow the requested format exactly. This pass cleans up
//! what it can and otherwise reports [`Validated::NeedsFallback`]:
//!
//! 1. Drop markdown code fences and quotes glued to the speaker labels.
//! 2. With fewer than three `<p>` turns, flatten the text and look for
//!    `Name:` / `**Name:**` labels instead, rebuilding up to six paragraphs
//!    in order of appearance.
//! 3. Collapse doubled or empty paragraphs.
//! 4. Put each persona's icon in front of its label, unless images are
//!    already there.

use crate::personas::Persona;
use crate::utils::{collapse_whitespace, strip_markup};
use html_escape::encode_text;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

/// Fewer recoverable turns than this and the output is discarded.
pub const MIN_TURNS: usize = 3;
/// Turns kept when rebuilding paragraphs from loose labels.
pub const MAX_TURNS: usize = 6;

const QUOTE_CHARS: &[char] = &['"', '\'', '“', '”', '‘', '’', '«', '»'];

static CODE_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*```[A-Za-z]*[ \t]*$\n?").unwrap());

static LABEL_QUOTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(<strong>\s*(?:Sagredo|Salviati|Salvati|Simplicio|Simplício)\s*:\s*</strong>)\s*["'“”‘’«»]+\s*"#,
    )
    .unwrap()
});

static PARAGRAPH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<p\b[^>]*>.*?</p>").unwrap());

/// Labels in flattened text: `Sagredo:`, `**Salvati:**`, `Simplicio (rindo):`.
static LOOSE_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\**\b(Sagredo|Salviati|Salvati|Simplicio|Simplício)\b\**(?:\s*\([^)]*\))?\s*\**\s*:\s*\**",
    )
    .unwrap()
});

static NESTED_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<p>\s*<p>").unwrap());
static NESTED_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</p>\s*</p>").unwrap());
static EMPTY_PARAGRAPH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<p>\s*</p>\s*").unwrap());

/// Outcome of checking the model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validated {
    /// Usable dialogue HTML.
    Dialogue(String),
    /// Too little structure survived; use the fallback dialogue.
    NeedsFallback,
}

/// Validate `raw` model output, repairing it where possible.
///
/// Output with at least [`MIN_TURNS`] `<p>` paragraphs is kept as HTML.
/// Otherwise the turns are recovered from the flattened text with
/// [`recover_turns`] and rebuilt as escaped `<p><strong>Label:</strong>`
/// paragraphs.
///
/// # Arguments
///
/// * `raw` - The completion text, already cut at the first stop marker
///
/// # Returns
///
/// [`Validated::Dialogue`] with icons injected, or
/// [`Validated::NeedsFallback`] when fewer than [`MIN_TURNS`] turns can be
/// found.
pub fn validate(raw: &str) -> Validated {
    let html = strip_code_fences(raw);
    let html = strip_label_quotes(&html);

    let html = if count_paragraphs(&html) < MIN_TURNS {
        let turns = recover_turns(&html);
        if turns.len() < MIN_TURNS {
            return Validated::NeedsFallback;
        }
        rewrap(&turns)
    } else {
        html
    };

    let html = collapse_paragraphs(&html);
    Validated::Dialogue(inject_icons(html.trim()))
}

fn strip_code_fences(text: &str) -> String {
    CODE_FENCE_RE.replace_all(text, "").into_owned()
}

/// Remove quote characters right after a bold speaker label.
pub fn strip_label_quotes(html: &str) -> String {
    LABEL_QUOTE_RE.replace_all(html, "$1 ").into_owned()
}

pub fn count_paragraphs(html: &str) -> usize {
    PARAGRAPH_RE.find_iter(html).count()
}

/// Find `(persona, speech)` pairs in the flattened output.
///
/// Each speech runs from its label to the next one; empty speeches are
/// skipped. Pairs are then stably sorted by the first occurrence of their
/// speech in the flattened text, so a repeated line moves up to where it
/// first appeared and ties keep label order. Speech that cannot be located
/// goes last.
///
/// # Arguments
///
/// * `html` - Model output; markup is stripped and entities decoded first
///
/// # Returns
///
/// At most [`MAX_TURNS`] pairs, with plain (unescaped) speech text.
pub fn recover_turns(html: &str) -> Vec<(Persona, String)> {
    let flat = strip_markup(html);

    let labels: Vec<(Persona, usize, usize)> = LOOSE_LABEL_RE
        .captures_iter(&flat)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let persona = Persona::from_label(caps.get(1)?.as_str())?;
            Some((persona, whole.start(), whole.end()))
        })
        .collect();

    let pairs = labels.iter().enumerate().filter_map(|(i, &(persona, _, end))| {
        let next = labels.get(i + 1).map_or(flat.len(), |&(_, start, _)| start);
        let speech = clean_speech(&flat[end..next]);
        (!speech.is_empty()).then_some((persona, speech))
    });

    pairs
        .map(|(persona, speech)| (flat.find(speech.as_str()), persona, speech))
        .sorted_by_key(|(offset, _, _)| (offset.is_none(), *offset))
        .take(MAX_TURNS)
        .map(|(_, persona, speech)| (persona, speech))
        .collect()
}

fn clean_speech(segment: &str) -> String {
    let trimmed = segment
        .trim()
        .trim_matches(|c: char| QUOTE_CHARS.contains(&c) || c == '*' || c.is_whitespace());
    collapse_whitespace(trimmed)
}

/// Rebuild paragraphs from recovered turns.
///
/// Speech comes from entity-decoded text, so it is re-escaped before being
/// placed back into markup.
fn rewrap(turns: &[(Persona, String)]) -> String {
    turns
        .iter()
        .map(|(persona, speech)| {
            format!(
                "<p><strong>{}:</strong> {}</p>",
                encode_text(persona.label()),
                encode_text(speech)
            )
        })
        .join("\n")
}

/// Merge `<p><p>` and `</p></p>` and drop empty paragraphs.
pub fn collapse_paragraphs(html: &str) -> String {
    let html = NESTED_OPEN_RE.replace_all(html, "<p>");
    let html = NESTED_CLOSE_RE.replace_all(&html, "</p>");
    EMPTY_PARAGRAPH_RE.replace_all(&html, "").into_owned()
}

/// Put each persona's icon before its exact `<strong>Label:</strong>`.
///
/// Output that already contains an `<img` is left alone.
pub fn inject_icons(html: &str) -> String {
    if html.contains("<img") {
        return html.to_string();
    }
    let mut out = html.to_string();
    for persona in Persona::ALL {
        for label in persona.aliases() {
            let bold = format!("<strong>{label}:</strong>");
            out = out.replace(&bold, &format!("{}{}", persona.icon_tag(label), bold));
        }
    }
    out
}
