//! The three speakers of the dialogue.
//!
//! Each persona has a canonical label, the spellings accepted when matching
//! model output, a personality used in the prompt, and a decorative icon.

/// Icon attributes shared by every persona image.
pub const ICON_STYLE: &str =
    r#"width="24" height="24" style="vertical-align: middle; margin-right: 8px;""#;

const SAGREDO_ICON: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='24' height='24' viewBox='0 0 24 24' fill='none' stroke='%232c5aa0' stroke-width='2'%3E%3Ccircle cx='12' cy='12' r='10'/%3E%3Cpath d='M8 14s1.5 2 4 2 4-2 4-2'/%3E%3Cline x1='9' y1='9' x2='9.01' y2='9'/%3E%3Cline x1='15' y1='9' x2='15.01' y2='9'/%3E%3C/svg%3E";
const SALVIATI_ICON: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='24' height='24' viewBox='0 0 24 24' fill='none' stroke='%23c53030' stroke-width='2'%3E%3Ccircle cx='12' cy='12' r='10'/%3E%3Cpath d='M16 16s-1.5-2-4-2-4 2-4 2'/%3E%3Cline x1='9' y1='9' x2='9.01' y2='9'/%3E%3Cline x1='15' y1='9' x2='15.01' y2='9'/%3E%3C/svg%3E";
const SIMPLICIO_ICON: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='24' height='24' viewBox='0 0 24 24' fill='none' stroke='%2338a169' stroke-width='2'%3E%3Ccircle cx='12' cy='12' r='10'/%3E%3Cline x1='8' y1='15' x2='16' y2='15'/%3E%3Cline x1='9' y1='9' x2='9.01' y2='9'/%3E%3Cline x1='15' y1='9' x2='15.01' y2='9'/%3E%3C/svg%3E";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    Sagredo,
    Salviati,
    Simplicio,
}

/// Speaking order of the six turns.
pub const TURN_ORDER: [Persona; 6] = [
    Persona::Sagredo,
    Persona::Salviati,
    Persona::Simplicio,
    Persona::Sagredo,
    Persona::Simplicio,
    Persona::Salviati,
];

impl Persona {
    pub const ALL: [Persona; 3] = [Persona::Sagredo, Persona::Salviati, Persona::Simplicio];

    /// Canonical label, as written in the prompt and in repaired output.
    pub fn label(self) -> &'static str {
        match self {
            Persona::Sagredo => "Sagredo",
            Persona::Salviati => "Salviati",
            Persona::Simplicio => "Simplicio",
        }
    }

    /// Every spelling matched when reading model output, canonical first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Persona::Sagredo => &["Sagredo"],
            Persona::Salviati => &["Salviati", "Salvati"],
            Persona::Simplicio => &["Simplicio", "Simplício"],
        }
    }

    pub fn personality(self) -> &'static str {
        match self {
            Persona::Sagredo => "irônico, inquieto",
            Persona::Salviati => "crítico, pós-moderno",
            Persona::Simplicio => "conservador, confiante",
        }
    }

    pub fn icon_url(self) -> &'static str {
        match self {
            Persona::Sagredo => SAGREDO_ICON,
            Persona::Salviati => SALVIATI_ICON,
            Persona::Simplicio => SIMPLICIO_ICON,
        }
    }

    /// `<img>` tag placed right before the bold label `alt`.
    pub fn icon_tag(self, alt: &str) -> String {
        format!(r#"<img src="{}" {} alt="{}">"#, self.icon_url(), ICON_STYLE, alt)
    }

    /// Resolve a label found in model output (case-insensitive, aliases included).
    pub fn from_label(label: &str) -> Option<Persona> {
        let label = label.trim();
        Persona::ALL.into_iter().find(|p| {
            p.aliases()
                .iter()
                .any(|alias| alias.to_lowercase() == label.to_lowercase())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_order_rotation() {
        let labels: Vec<_> = TURN_ORDER.iter().map(|p| p.label()).collect();
        assert_eq!(
            labels,
            ["Sagredo", "Salviati", "Simplicio", "Sagredo", "Simplicio", "Salviati"]
        );
    }

    #[test]
    fn test_from_label_accepts_aliases() {
        assert_eq!(Persona::from_label("Salvati"), Some(Persona::Salviati));
        assert_eq!(Persona::from_label("SALVIATI"), Some(Persona::Salviati));
        assert_eq!(Persona::from_label(" sagredo "), Some(Persona::Sagredo));
        assert_eq!(Persona::from_label("Simplício"), Some(Persona::Simplicio));
        assert_eq!(Persona::from_label("Galileu"), None);
    }

    #[test]
    fn test_icons_are_distinct() {
        assert_ne!(Persona::Sagredo.icon_url(), Persona::Salviati.icon_url());
        assert_ne!(Persona::Salviati.icon_url(), Persona::Simplicio.icon_url());
        let tag = Persona::Simplicio.icon_tag("Simplicio");
        assert!(tag.starts_with("<img src=\"data:image/svg+xml"));
        assert!(tag.ends_with(r#"alt="Simplicio">"#));
    }
}
