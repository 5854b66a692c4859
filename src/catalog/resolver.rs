use once_cell::sync::Lazy;
use std::collections::HashMap;

/// German category labels keyed by upstream code
static GERMAN_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("normal", "Normal"),
        ("fighting", "Kampf"),
        ("flying", "Flug"),
        ("poison", "Gift"),
        ("ground", "Boden"),
        ("rock", "Gestein"),
        ("bug", "Käfer"),
        ("ghost", "Geist"),
        ("steel", "Stahl"),
        ("fire", "Feuer"),
        ("water", "Wasser"),
        ("grass", "Pflanze"),
        ("electric", "Elektro"),
        ("psychic", "Psycho"),
        ("ice", "Eis"),
        ("dragon", "Drache"),
        ("dark", "Unlicht"),
        ("fairy", "Fee"),
    ])
});

/// Maps upstream category codes to display labels for one locale
#[derive(Debug, Clone)]
pub struct CategoryResolver {
    locale: String,
    table: Option<&'static HashMap<&'static str, &'static str>>,
}

impl CategoryResolver {
    pub fn new(locale: &str) -> Self {
        let locale = locale.trim().to_lowercase();
        let table = match locale.as_str() {
            "de" => Some(&*GERMAN_LABELS),
            _ => None,
        };
        Self { locale, table }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Translate a category code; unknown codes come back unchanged
    pub fn resolve(&self, code: &str) -> String {
        self.table
            .and_then(|table| table.get(code))
            .map(|label| label.to_string())
            .unwrap_or_else(|| code.to_string())
    }

    /// Reverse lookup across every known locale
    pub fn code_for_label(label: &str) -> Option<&'static str> {
        if let Some((code, _)) = GERMAN_LABELS.get_key_value(label) {
            return Some(*code);
        }
        GERMAN_LABELS
            .iter()
            .find(|(_, de)| **de == label)
            .map(|(code, _)| *code)
    }
}
