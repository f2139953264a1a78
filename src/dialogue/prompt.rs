//! The instruction sent to the model.

use crate::models::NewsItem;
use crate::personas::TURN_ORDER;
use std::fmt::Write;

/// Stand-in for an empty news summary.
pub const MISSING_SUMMARY: &str =
    "(O resumo da notícia não foi fornecido. Baseie o diálogo apenas no título.)";

/// Build the dialogue prompt for `news`.
///
/// Personalities are spelled out on the first appearance of each persona.
pub fn build_prompt(news: &NewsItem) -> String {
    let summary = if news.summary().trim().is_empty() {
        MISSING_SUMMARY
    } else {
        news.summary()
    };

    let mut turns = String::new();
    let mut introduced = Vec::new();
    for (i, persona) in TURN_ORDER.iter().enumerate() {
        if introduced.contains(persona) {
            let _ = writeln!(turns, "{}. {}", i + 1, persona.label());
        } else {
            introduced.push(*persona);
            let _ = writeln!(
                turns,
                "{}. {} (personalidade: {})",
                i + 1,
                persona.label(),
                persona.personality()
            );
        }
    }

    format!(
        r#"Crie um diálogo filosófico em português do Brasil sobre a seguinte notícia.

Notícia:
- Título: "{title}"
- Resumo: "{summary}"

O diálogo deve seguir estritamente a seguinte sequência de seis turnos:
{turns}
A resposta deve ser apenas o código HTML, contendo EXATAMENTE seis falas, uma para cada turno, com cada fala dentro de uma tag <p> e o nome do personagem em <strong>, no formato <p><strong>Nome:</strong> fala</p>. Não inclua nenhum outro texto, aspas ou marcador de código."#,
        title = news.title(),
        summary = summary,
        turns = turns,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_news() {
        let news = NewsItem::new(
            "Inflação desacelera em setembro",
            "O IPCA subiu 0,2% no mês, abaixo das projeções",
            "https://example.com",
        );
        let prompt = build_prompt(&news);
        assert!(prompt.contains(r#"- Título: "Inflação desacelera em setembro""#));
        assert!(prompt.contains(r#"- Resumo: "O IPCA subiu 0,2% no mês, abaixo das projeções""#));
        assert!(!prompt.contains(MISSING_SUMMARY));
    }

    #[test]
    fn test_prompt_placeholder_for_empty_summary() {
        let news = NewsItem::new("Título curto", "", "");
        let prompt = build_prompt(&news);
        assert!(prompt.contains(MISSING_SUMMARY));
    }

    #[test]
    fn test_prompt_turn_order() {
        let prompt = build_prompt(&NewsItem::new("T", "", ""));
        assert!(prompt.contains("1. Sagredo (personalidade: irônico, inquieto)\n"));
        assert!(prompt.contains("2. Salviati (personalidade: crítico, pós-moderno)\n"));
        assert!(prompt.contains("3. Simplicio (personalidade: conservador, confiante)\n"));
        assert!(prompt.contains("4. Sagredo\n5. Simplicio\n6. Salviati\n"));
    }
}
