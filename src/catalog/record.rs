use serde::{Deserialize, Serialize};

/// One base stat of a record, kept in upstream order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub value: u32,
}

/// Normalized catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Stable upstream identifier, unique within a collection
    pub id: u32,
    /// Upstream (English) identifier, e.g. `bulbasaur`
    pub canonical_name: String,
    /// Name in the configured locale, absent when upstream has no entry
    #[serde(default)]
    pub localized_name: Option<String>,
    /// Localized category labels; the first one drives the accent color
    pub categories: Vec<String>,
    /// Image URL, empty when upstream has none
    #[serde(default)]
    pub image_ref: String,
    pub stats: Vec<Stat>,
}

impl Record {
    /// Name shown to the user: localized when known, canonical otherwise
    pub fn display_name(&self) -> &str {
        self.localized_name
            .as_deref()
            .unwrap_or(&self.canonical_name)
    }

    /// Category that determines the display accent
    pub fn primary_category(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }

    /// Check the structural invariants a record must hold before it may
    /// enter a collection. Returns a description of the first violation.
    pub fn validate(&self) -> Result<(), String> {
        if self.id == 0 {
            return Err("record id must be positive".to_string());
        }
        if self.canonical_name.trim().is_empty() {
            return Err(format!("record {} has an empty canonical name", self.id));
        }
        if self.categories.is_empty() {
            return Err(format!("record {} has no categories", self.id));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::record;
    use super::*;

    #[test]
    fn test_display_name_prefers_localized() {
        let r = record(1, "bulbasaur", Some("Bisasam"));
        assert_eq!(r.display_name(), "Bisasam");

        let r = record(1, "bulbasaur", None);
        assert_eq!(r.display_name(), "bulbasaur");
    }

    #[test]
    fn test_validate_rejects_broken_records() {
        let mut r = record(1, "bulbasaur", None);
        assert!(r.validate().is_ok());

        r.categories.clear();
        assert!(r.validate().unwrap_err().contains("no categories"));

        let mut r = record(0, "missingno", None);
        assert!(r.validate().is_err());
        r.id = 7;
        r.canonical_name = "  ".to_string();
        assert!(r.validate().unwrap_err().contains("empty canonical name"));
    }

    #[test]
    fn test_missing_optional_fields_deserialize() {
        let json = r#"{
            "id": 25,
            "canonical_name": "pikachu",
            "categories": ["Elektro"],
            "stats": [{"name": "hp", "value": 35}]
        }"#;
        let r: Record = serde_json::from_str(json).unwrap();
        assert_eq!(r.localized_name, None);
        assert_eq!(r.image_ref, "");
        assert_eq!(r.primary_category(), Some("Elektro"));
    }
}
