//! Intent resolution over the pattern catalog.

use tracing::debug;

use crate::catalog::{Intent, PatternCatalog};
use crate::normalize::FoldedText;

/// Outcome of resolving one user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub intent: Intent,
    /// Raw capture texts, cut from the original input (accents preserved)
    pub captures: Vec<String>,
}

impl Resolution {
    pub fn fallback() -> Self {
        Self {
            intent: Intent::Fallback,
            captures: Vec::new(),
        }
    }
}

/// Maps free text to the first matching intent of the catalog.
#[derive(Debug, Clone)]
pub struct IntentResolver {
    catalog: PatternCatalog,
}

impl IntentResolver {
    pub fn new(catalog: PatternCatalog) -> Self {
        Self { catalog }
    }

    /// Resolve `text` against the catalog. Matching is unanchored, case- and
    /// accent-insensitive; the first rule that matches wins.
    pub fn resolve(&self, text: &str) -> Resolution {
        let folded = FoldedText::new(text);

        for rule in self.catalog.rules() {
            let Some(caps) = rule.matcher.captures(folded.as_str()) else {
                continue;
            };

            let captures = (1..=rule.captures)
                .map(|i| {
                    caps.get(i)
                        .map(|m| folded.original_slice(m.start(), m.end()).to_string())
                        .unwrap_or_default()
                })
                .collect();

            debug!(intent = ?rule.intent, pattern = rule.matcher.as_str(), "Resolved intent");
            return Resolution {
                intent: rule.intent,
                captures,
            };
        }

        debug!("No pattern matched, falling back");
        Resolution::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PatternRule;

    fn resolver() -> IntentResolver {
        IntentResolver::new(PatternCatalog::builtin().unwrap())
    }

    #[test]
    fn test_greetings_any_case_and_accents() {
        let r = resolver();
        for input in ["Hola buenas", "HOLA", "buenos días", "Buenos DÍAS!", "hey"] {
            assert_eq!(r.resolve(input).intent, Intent::Greeting, "{}", input);
        }
    }

    #[test]
    fn test_route_with_question_marks_and_accents() {
        let resolution = resolver().resolve("¿Cuánto tarda de barcelona a girona?");
        assert_eq!(resolution.intent, Intent::CalculateRoute);
        assert_eq!(resolution.captures, vec!["barcelona", "girona"]);
    }

    #[test]
    fn test_route_captures_keep_original_accents() {
        let resolution = resolver().resolve("Ruta desde Móra d'Ebre hasta Tàrrega");
        assert_eq!(resolution.intent, Intent::CalculateRoute);
        assert_eq!(resolution.captures, vec!["Móra d'Ebre", "Tàrrega"]);
    }

    #[test]
    fn test_route_alternative_phrasings() {
        let r = resolver();
        let between = r.resolve("distancia entre Reus y Valls");
        assert_eq!(between.intent, Intent::CalculateRoute);
        assert_eq!(between.captures, vec!["Reus", "Valls"]);

        let arrow = r.resolve("Vic -> Olot");
        assert_eq!(arrow.intent, Intent::CalculateRoute);
        assert_eq!(arrow.captures, vec!["Vic", "Olot"]);
    }

    #[test]
    fn test_route_skips_filler_before_origin() {
        let r = resolver();
        let cases = [
            ("¿Qué distancia hay entre Reus y Valls?", ["Reus", "Valls"]),
            ("¿Cuánto tiempo de viaje hay de Barcelona a Girona?", ["Barcelona", "Girona"]),
            ("¿Cuánto tarda el tren de cercanías de Barcelona a Girona?", ["Barcelona", "Girona"]),
            ("¿Cuánto se tarda en coche desde Lleida hasta Tarragona?", ["Lleida", "Tarragona"]),
        ];
        for (input, expected) in cases {
            let resolution = r.resolve(input);
            assert_eq!(resolution.intent, Intent::CalculateRoute, "{}", input);
            assert_eq!(resolution.captures, expected, "{}", input);
        }
    }

    #[test]
    fn test_route_place_names_containing_de() {
        let r = resolver();
        let resolution = r.resolve("Ruta de Sant Andreu de la Barca a Girona");
        assert_eq!(resolution.captures, vec!["Sant Andreu de la Barca", "Girona"]);

        let resolution = r.resolve("ruta de la Seu d'Urgell a Lleida");
        assert_eq!(resolution.captures, vec!["la Seu d'Urgell", "Lleida"]);
    }

    #[test]
    fn test_route_trailing_courtesy_is_not_captured() {
        let r = resolver();
        let resolution = r.resolve("Ruta de Vic a Olot, por favor");
        assert_eq!(resolution.captures, vec!["Vic", "Olot"]);

        let resolution = r.resolve("distancia de Vic a Olot por favor");
        assert_eq!(resolution.captures, vec!["Vic", "Olot"]);

        let resolution = r.resolve("ruta de Vic a Sant Joan de les Abadesses. Gracias");
        assert_eq!(resolution.captures, vec!["Vic", "Sant Joan de les Abadesses"]);
    }

    #[test]
    fn test_municipalities() {
        let r = resolver();
        let resolution = r.resolve("Municipios de la provincia de Lleida");
        assert_eq!(resolution.intent, Intent::ListMunicipalities);
        assert_eq!(resolution.captures, vec!["Lleida"]);

        let resolution = r.resolve("pueblos en girona");
        assert_eq!(resolution.captures, vec!["girona"]);
    }

    #[test]
    fn test_municipalities_trailing_text_is_not_captured() {
        let r = resolver();
        for input in [
            "municipios de Girona, por favor",
            "municipios de Girona por favor",
            "¿Qué municipios hay en la provincia de Girona?",
            "pueblos de Girona. Gracias",
        ] {
            let resolution = r.resolve(input);
            assert_eq!(resolution.intent, Intent::ListMunicipalities, "{}", input);
            assert_eq!(resolution.captures, vec!["Girona"], "{}", input);
        }
    }

    #[test]
    fn test_other_intents() {
        let r = resolver();
        assert_eq!(r.resolve("¿Qué puedes hacer?").intent, Intent::Help);
        assert_eq!(r.resolve("¿quién soy?").intent, Intent::WhoAmI);
        assert_eq!(r.resolve("ver estadísticas").intent, Intent::Stats);
        assert_eq!(r.resolve("estado de la caché").intent, Intent::Stats);
    }

    #[test]
    fn test_earliest_group_wins_on_overlap() {
        let r = resolver();
        // Greeting precedes CalculateRoute.
        let resolution = r.resolve("Hola, ruta de Barcelona a Girona");
        assert_eq!(resolution.intent, Intent::Greeting);
        assert!(resolution.captures.is_empty());

        // Help precedes ListMunicipalities.
        assert_eq!(r.resolve("ayuda con municipios de Girona").intent, Intent::Help);

        // Stats precedes CalculateRoute.
        assert_eq!(
            r.resolve("estadisticas de la ruta de Vic a Olot").intent,
            Intent::Stats
        );
    }

    #[test]
    fn test_unmatched_is_fallback() {
        let resolution = resolver().resolve("me gusta el queso");
        assert_eq!(resolution, Resolution::fallback());
    }

    #[test]
    fn test_declared_order_within_group() {
        let rules = vec![
            PatternRule::compile(Intent::CalculateRoute, r"^(\w+) (\w+)").unwrap(),
            PatternRule::compile(Intent::CalculateRoute, r"de (\w+) a (\w+)").unwrap(),
        ];
        let r = IntentResolver::new(PatternCatalog::from_rules(rules).unwrap());
        let resolution = r.resolve("de vic a olot");
        assert_eq!(resolution.captures, vec!["de", "vic"]);
    }
}
