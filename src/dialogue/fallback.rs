//! The fixed dialogue used whenever the model cannot be used.

use crate::models::NewsItem;
use crate::personas::{Persona, TURN_ORDER};
use itertools::Itertools;

/// Speeches of the fallback dialogue, in [`TURN_ORDER`]. `{titulo}` is
/// replaced by the news title.
const FALLBACK_LINES: [&str; 6] = [
    r#"Ora, que interessante esta notícia sobre "{titulo}". Mas será que devemos confiar plenamente no que lemos nos jornais modernos?"#,
    "Sagredo levanta uma questão pertinente. Vivemos numa era de informação fragmentada, onde cada notícia é apenas um recorte da realidade, moldado por interesses específicos.",
    "Amigos, creio que vocês complicam demasiadamente as coisas. Se está nos jornais, especialmente em fontes respeitáveis, devemos considerar que há fundamento na informação.",
    r#"Ah, Simplicio, sua fé na autoridade das fontes me impressiona! Mas não seria prudente questionar também as próprias bases dessas "fontes respeitáveis"?"#,
    "O ceticismo excessivo nos levaria à paralisia total, Sagredo. É necessário confiar em alguma estrutura de conhecimento para que possamos avançar em nossa compreensão do mundo.",
    "Talvez a verdade esteja no meio-termo: nem a credulidade cega de Simplicio, nem o ceticismo absoluto de Sagredo, mas uma postura crítica que avalie cada informação em seu contexto específico.",
];

fn paragraph(persona: Persona, speech: &str) -> String {
    format!(
        "<p>{}<strong>{}:</strong> {}</p>",
        persona.icon_tag(persona.label()),
        persona.label(),
        speech
    )
}

/// Six paragraphs with icons; the title is inserted verbatim in the first.
pub fn fallback_dialogue(news: &NewsItem) -> String {
    TURN_ORDER
        .iter()
        .zip(FALLBACK_LINES)
        .map(|(persona, line)| paragraph(*persona, &line.replace("{titulo}", news.title())))
        .join("\n")
}
