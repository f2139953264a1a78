//! Turning a raw feed entry into a [`NewsItem`].
//!
//! Google News titles carry the outlet as a `" - Source"` suffix and the
//! description is an HTML snippet that often just repeats the headline. The
//! steps here strip both, drop leftovers too short to be useful, and flag
//! text the feed cut off with an ellipsis.

use super::google_news::FeedEntry;
use crate::models::NewsItem;
use crate::utils::strip_markup;

/// Overlap ratio (common prefix / title length) above which the prefix is
/// removed from the summary.
pub const PREFIX_OVERLAP_THRESHOLD: f64 = 0.9;
/// Summaries with fewer words than this are discarded.
pub const MIN_SUMMARY_WORDS: usize = 4;

pub const TITLE_TRUNCATED_NOTE: &str = " (título completo no link)";
pub const SUMMARY_TRUNCATED_NOTE: &str = " (continuação disponível na matéria original)";

/// Characters stripped from the start of what is left after prefix removal.
const LEADING_SEPARATORS: &[char] = &[' ', '-', '–', '—', ':'];

/// Build a normalized [`NewsItem`] from a feed entry.
///
/// Steps, in order: cut the source suffix from the title, flatten the
/// description to plain text, drop a repeated title prefix from the summary,
/// drop a trivial summary, then append the truncation notes to a title or
/// summary that ends in an ellipsis.
///
/// # Arguments
///
/// * `entry` - One `<item>` from the RSS channel
///
/// # Returns
///
/// A [`NewsItem`] whose summary may be empty.
pub fn normalize_entry(entry: &FeedEntry) -> NewsItem {
    let title = clean_title(&entry.title);
    let summary = clean_snippet(&entry.description);
    let summary = drop_redundant_prefix(&title, &summary);
    let summary = drop_trivial(summary);

    NewsItem::new(
        mark_truncated(title, TITLE_TRUNCATED_NOTE),
        mark_truncated(summary, SUMMARY_TRUNCATED_NOTE),
        entry.link.trim(),
    )
}

/// Remove everything from the first `" - "` onward and trim.
pub fn clean_title(raw: &str) -> String {
    let head = match raw.find(" - ") {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    head.trim().to_string()
}

/// Flatten the HTML snippet to single-spaced plain text.
pub fn clean_snippet(raw: &str) -> String {
    strip_markup(raw)
}

/// Length in chars of the longest case-insensitive common prefix.
pub fn common_prefix_len_ignore_case(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x.to_lowercase().eq(y.to_lowercase()))
        .count()
}

/// Drop the title from the front of the summary when it is mostly a repeat.
///
/// The ratio is measured against the title's own length; an empty title
/// leaves the summary untouched.
///
/// # Arguments
///
/// * `title` - The cleaned title
/// * `summary` - The flattened snippet
///
/// # Returns
///
/// The summary without the shared prefix and the separators after it when
/// the common prefix covers more than [`PREFIX_OVERLAP_THRESHOLD`] of the
/// title; otherwise the summary unchanged.
pub fn drop_redundant_prefix(title: &str, summary: &str) -> String {
    let title_len = title.chars().count();
    if title_len == 0 {
        return summary.to_string();
    }

    let common = common_prefix_len_ignore_case(title, summary);
    if (common as f64 / title_len as f64) > PREFIX_OVERLAP_THRESHOLD {
        let rest: String = summary.chars().skip(common).collect();
        rest.trim_start_matches(LEADING_SEPARATORS).trim().to_string()
    } else {
        summary.to_string()
    }
}

/// Empty the summary when it has fewer than [`MIN_SUMMARY_WORDS`] words.
pub fn drop_trivial(summary: String) -> String {
    if summary.split_whitespace().count() < MIN_SUMMARY_WORDS {
        String::new()
    } else {
        summary
    }
}

/// Append `note` when `text` ends with an ellipsis.
pub fn mark_truncated(mut text: String, note: &str) -> String {
    if text.ends_with("...") || text.ends_with('…') {
        text.push_str(note);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, description: &str) -> FeedEntry {
        FeedEntry {
            title: title.to_string(),
            link: "https://news.google.com/rss/articles/abc".to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_clean_title_strips_source_suffix() {
        assert_eq!(clean_title("Empresa anuncia resultado - G1"), "Empresa anuncia resultado");
        assert_eq!(clean_title("  Sem fonte  "), "Sem fonte");
        // only the first separator counts
        assert_eq!(clean_title("A - B - Folha"), "A");
        // a bare hyphen inside a word is not a separator
        assert_eq!(clean_title("Pós-graduação cresce"), "Pós-graduação cresce");
    }

    #[test]
    fn test_common_prefix_is_case_insensitive() {
        assert_eq!(common_prefix_len_ignore_case("Ação Direta", "AÇÃO direta hoje"), 11);
        assert_eq!(common_prefix_len_ignore_case("abc", "xyz"), 0);
        assert_eq!(common_prefix_len_ignore_case("", "abc"), 0);
    }

    #[test]
    fn test_redundant_prefix_removed() {
        let out = drop_redundant_prefix(
            "Banco Central mantém juros",
            "Banco Central mantém juros - decisão surpreende o mercado financeiro",
        );
        assert_eq!(out, "decisão surpreende o mercado financeiro");
    }

    #[test]
    fn test_redundant_prefix_strips_dash_variants_and_colon() {
        let out = drop_redundant_prefix("Chuva forte", "chuva forte — : alerta em cinco estados");
        assert_eq!(out, "alerta em cinco estados");
    }

    #[test]
    fn test_partial_overlap_keeps_summary() {
        // 6 of 26 chars in common is well below the threshold
        let summary = "Banco do Brasil abre concurso com mil vagas";
        assert_eq!(drop_redundant_prefix("Banco Central mantém juros", summary), summary);
    }

    #[test]
    fn test_empty_title_skips_overlap_check() {
        assert_eq!(drop_redundant_prefix("", "texto qualquer aqui mesmo"), "texto qualquer aqui mesmo");
    }

    #[test]
    fn test_trivial_summary_dropped() {
        assert_eq!(drop_trivial("ok sim".to_string()), "");
        assert_eq!(drop_trivial("três palavras apenas".to_string()), "");
        assert_eq!(drop_trivial("agora são quatro palavras".to_string()), "agora são quatro palavras");
    }

    #[test]
    fn test_mark_truncated() {
        assert_eq!(
            mark_truncated("Governo anuncia...".to_string(), TITLE_TRUNCATED_NOTE),
            "Governo anuncia... (título completo no link)"
        );
        assert_eq!(
            mark_truncated("Governo anuncia…".to_string(), TITLE_TRUNCATED_NOTE),
            "Governo anuncia… (título completo no link)"
        );
        assert_eq!(mark_truncated("Completo.".to_string(), TITLE_TRUNCATED_NOTE), "Completo.");
        assert_eq!(mark_truncated(String::new(), SUMMARY_TRUNCATED_NOTE), "");
    }

    #[test]
    fn test_normalize_entry_scenario_title_repeated_in_snippet() {
        let item = normalize_entry(&entry(
            "Empresa anuncia resultado - G1",
            "Empresa anuncia resultado recorde no trimestre.",
        ));
        assert_eq!(item.title(), "Empresa anuncia resultado");
        // "recorde no trimestre." is only three words
        assert_eq!(item.summary(), "");
    }

    #[test]
    fn test_normalize_entry_google_news_markup() {
        let item = normalize_entry(&entry(
            "Satélite brasileiro entra em órbita - Agência Brasil",
            r##"<a href="https://news.google.com/rss/articles/abc" target="_blank">Satélite brasileiro entra em órbita</a>&nbsp;&nbsp;<font color="#6f6f6f">Agência Brasil</font>"##,
        ));
        assert_eq!(item.title(), "Satélite brasileiro entra em órbita");
        // "Agência Brasil" is left after the prefix, fewer than four words
        assert_eq!(item.summary(), "");
        assert_eq!(item.link(), "https://news.google.com/rss/articles/abc");
    }

    #[test]
    fn test_normalize_entry_keeps_distinct_summary() {
        let item = normalize_entry(&entry(
            "Inflação desacelera em setembro - Valor",
            "<p>O IPCA subiu 0,2% no mês, abaixo das projeções do mercado...</p>",
        ));
        assert_eq!(item.title(), "Inflação desacelera em setembro");
        assert_eq!(
            item.summary(),
            "O IPCA subiu 0,2% no mês, abaixo das projeções do mercado... (continuação disponível na matéria original)"
        );
    }

    #[test]
    fn test_normalize_entry_truncated_title() {
        let item = normalize_entry(&entry("Pesquisadores descobrem nova espécie de... - Folha", ""));
        assert_eq!(
            item.title(),
            "Pesquisadores descobrem nova espécie de... (título completo no link)"
        );
        assert_eq!(item.summary(), "");
    }

    #[test]
    fn test_summary_invariant_never_starts_with_title() {
        let item = normalize_entry(&entry(
            "Bolsa fecha em alta - InfoMoney",
            "BOLSA FECHA EM ALTA: Ibovespa sobe puxado por bancos e mineradoras",
        ));
        assert_eq!(item.summary(), "Ibovespa sobe puxado por bancos e mineradoras");
        assert!(!item.summary().to_lowercase().starts_with(&item.title().to_lowercase()));
    }
}
