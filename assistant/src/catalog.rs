//! Ordered table of intent patterns.
//!
//! Groups are evaluated strictly in [`Intent::PRECEDENCE`] order and rules
//! within a group in declaration order. Overlapping inputs resolve to the
//! earliest group, so reordering this table changes behavior.
//!
//! Patterns are written against folded text (lowercase, no diacritics), see
//! [`crate::normalize::FoldedText`].

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Closed set of things the assistant knows how to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Intent {
    Greeting,
    Help,
    WhoAmI,
    Stats,
    CalculateRoute,
    ListMunicipalities,
    Fallback,
}

impl Intent {
    /// Group evaluation order. `Fallback` has no patterns and comes last.
    pub const PRECEDENCE: [Intent; 6] = [
        Intent::Greeting,
        Intent::Help,
        Intent::WhoAmI,
        Intent::Stats,
        Intent::CalculateRoute,
        Intent::ListMunicipalities,
    ];
}

/// One matcher of an intent group.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub intent: Intent,
    pub matcher: Regex,
    /// Number of capture groups the handler expects
    pub captures: usize,
}

/// The full pattern table, already sorted by group precedence.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    rules: Vec<PatternRule>,
}

const GREETING: &[&str] = &[r"\b(?:hola|buenas|buenos dias|saludos|hey|hello|hi)\b"];

const HELP: &[&str] = &[
    r"\b(?:ayuda|help|comandos|opciones)\b",
    r"\bque (?:puedes|sabes) hacer\b",
];

const WHO_AM_I: &[&str] = &[r"\b(?:quien soy|mi perfil|mis datos|mi cuenta|who am i)\b"];

const STATS: &[&str] = &[
    r"\b(?:estadisticas|stats|metricas)\b",
    r"\b(?:cache|rate limit|limite de peticiones)\b",
];

// Captures that end a sentence stop before punctuation and a trailing
// "por favor" / "gracias". A '.' only ends a capture when followed by space
// or the end of text.
//
// The first route rule skips common filler between the keyword and the origin
// ("tiempo de viaje hay de ...", "tarda el tren de cercanias de ...") without
// splitting names that contain "de" ("Sant Andreu de la Barca").
const CALCULATE_ROUTE: &[&str] = &[
    r"\b(?:ruta|distancia|tarda|tardo|tiempo|llegar|viaje|trayecto|ir)\b(?:\s+(?:de\s+)?(?:viaje|hay|se|en|el|la|los|un|una|tren|coche|bus|autobus|cercanias|metro|moto|bici|bicicleta|mas|rapida|rapido|corta|corto|aproximado|aproximada|estimado|estimada|hace|falta|para|ir|llegar|tarda|tardo|conduciendo|andando|caminando)\b)*\s+de(?:sde)?\s+(.+?)\s+(?:a|hasta|hacia)\s+(.+?)\s*(?:\bpor favor\b|\bgracias\b)?\s*(?:[,;:!?]|\.(?:\s|$)|$)",
    r"\b(?:ruta|distancia|tarda|tardo|tiempo|viaje|trayecto|kilometros|km)\b.*?\bentre\s+(.+?)\s+(?:y|e)\s+(.+?)\s*(?:\bpor favor\b|\bgracias\b)?\s*(?:[,;:!?]|\.(?:\s|$)|$)",
    r"\b(?:ruta|distancia|tarda|tardo|tiempo|llegar|viaje|trayecto|ir)\b.*?\bde(?:sde)?\s+(.+?)\s+(?:a|hasta|hacia)\s+(.+?)\s*(?:\bpor favor\b|\bgracias\b)?\s*(?:[,;:!?]|\.(?:\s|$)|$)",
    r"\b(?:ruta|distancia|trayecto)\s+(.+?)\s+(?:y|hasta|a)\s+(.+?)\s*(?:\bpor favor\b|\bgracias\b)?\s*(?:[,;:!?]|\.(?:\s|$)|$)",
    r"^\s*(.+?)\s*(?:->|=>|→)\s*(.+)$",
];

const LIST_MUNICIPALITIES: &[&str] = &[
    r"\b(?:municipios|pueblos|poblaciones|localidades|ciudades)\s+(?:de|en)\s+(?:la\s+)?(?:provincia\s+de\s+)?(.+?)\s*(?:\bpor favor\b|\bgracias\b)?\s*(?:[,;:!?]|\.(?:\s|$)|$)",
    r"\bprovincia\s+de\s+(.+?)\s*(?:\bpor favor\b|\bgracias\b)?\s*(?:[,;:!?]|\.(?:\s|$)|$)",
];

impl PatternCatalog {
    /// The assistant's built-in catalog.
    pub fn builtin() -> Result<Self> {
        let groups: [(Intent, &[&str]); 6] = [
            (Intent::Greeting, GREETING),
            (Intent::Help, HELP),
            (Intent::WhoAmI, WHO_AM_I),
            (Intent::Stats, STATS),
            (Intent::CalculateRoute, CALCULATE_ROUTE),
            (Intent::ListMunicipalities, LIST_MUNICIPALITIES),
        ];

        let mut rules = Vec::new();
        for (intent, patterns) in groups {
            for pattern in patterns {
                rules.push(PatternRule::compile(intent, pattern)?);
            }
        }
        Self::from_rules(rules)
    }

    /// Build a catalog from explicit rules. Rules are stably regrouped by
    /// intent precedence; declaration order inside a group is kept.
    pub fn from_rules(mut rules: Vec<PatternRule>) -> Result<Self> {
        if let Some(rule) = rules.iter().find(|r| r.intent == Intent::Fallback) {
            return Err(Error::Internal(format!(
                "fallback cannot have patterns: {}",
                rule.matcher.as_str()
            )));
        }
        rules.sort_by_key(|r| Intent::PRECEDENCE.iter().position(|i| *i == r.intent));
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }
}

impl PatternRule {
    /// Compile a case-insensitive matcher. The capture count is read from the
    /// pattern itself.
    pub fn compile(intent: Intent, pattern: &str) -> Result<Self> {
        let matcher = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::Internal(format!("invalid pattern {:?}: {}", pattern, e)))?;
        let captures = matcher.captures_len() - 1;
        Ok(Self {
            intent,
            matcher,
            captures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_compiles_in_precedence_order() {
        let catalog = PatternCatalog::builtin().unwrap();
        let order: Vec<Intent> = catalog.rules().iter().map(|r| r.intent).collect();
        let mut sorted = order.clone();
        sorted.sort_by_key(|i| Intent::PRECEDENCE.iter().position(|p| p == i));
        assert_eq!(order, sorted);
        assert_eq!(order.first(), Some(&Intent::Greeting));
        assert_eq!(order.last(), Some(&Intent::ListMunicipalities));
    }

    #[test]
    fn test_capture_counts() {
        let catalog = PatternCatalog::builtin().unwrap();
        for rule in catalog.rules() {
            let expected = match rule.intent {
                Intent::CalculateRoute => 2,
                Intent::ListMunicipalities => 1,
                _ => 0,
            };
            assert_eq!(rule.captures, expected, "{}", rule.matcher.as_str());
        }
    }

    #[test]
    fn test_from_rules_regroups_stably() {
        let rules = vec![
            PatternRule::compile(Intent::Stats, r"uno").unwrap(),
            PatternRule::compile(Intent::Greeting, r"dos").unwrap(),
            PatternRule::compile(Intent::Stats, r"tres").unwrap(),
        ];
        let catalog = PatternCatalog::from_rules(rules).unwrap();
        let patterns: Vec<&str> = catalog.rules().iter().map(|r| r.matcher.as_str()).collect();
        assert_eq!(patterns, vec!["dos", "uno", "tres"]);
    }

    #[test]
    fn test_fallback_rules_rejected() {
        let rules = vec![PatternRule::compile(Intent::Fallback, r"x").unwrap()];
        assert!(PatternCatalog::from_rules(rules).is_err());
    }
}
