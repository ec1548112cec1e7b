use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Canonical bilingual text. Every localized field is normalized into this
/// shape at the data-access boundary; nothing downstream branches on whether
/// a value arrived as a plain string or a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LocalizedText {
    pub uk: String,
    pub en: String,
}

impl LocalizedText {
    pub fn new(uk: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            uk: uk.into(),
            en: en.into(),
        }
    }

    /// Same value in both languages, for legacy strings with no known
    /// translation.
    pub fn uniform(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            uk: value.clone(),
            en: value,
        }
    }
}

/// Incoming localized value: records created through older admin forms carry
/// plain strings, newer ones carry a `{uk, en}` map. Deserialized untagged so
/// both wire shapes are accepted everywhere.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum LocalizedInput {
    Map { uk: String, en: String },
    Plain(String),
}

/// Which translation table applies when upgrading a plain string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Category,
    BeanType,
    Weight,
    FreeText,
}

const CATEGORIES: [(&str, &str); 4] = [
    ("Арабіка", "Arabica"),
    ("Робуста", "Robusta"),
    ("Купажі", "Blends"),
    ("Без кофеїну", "Decaf"),
];

const BEAN_TYPES: [(&str, &str); 3] = [
    ("Зерна", "Beans"),
    ("Мелена", "Ground"),
    ("Розчинна", "Instant"),
];

const WEIGHTS: [(&str, &str); 4] = [
    ("100г", "100g"),
    ("250г", "250g"),
    ("500г", "500g"),
    ("1кг", "1kg"),
];

fn lookup(table: &[(&str, &str)], uk: &str) -> Option<String> {
    table
        .iter()
        .find(|(k, _)| *k == uk)
        .map(|(_, v)| (*v).to_string())
}

impl LocalizedInput {
    /// Normalize into the canonical shape. Plain strings are treated as the
    /// Ukrainian value and upgraded through the field's translation table;
    /// unknown values pass through unchanged in both languages.
    pub fn normalize(self, kind: FieldKind) -> LocalizedText {
        match self {
            LocalizedInput::Map { uk, en } => LocalizedText { uk, en },
            LocalizedInput::Plain(value) => {
                let table: &[(&str, &str)] = match kind {
                    FieldKind::Category => &CATEGORIES,
                    FieldKind::BeanType => &BEAN_TYPES,
                    FieldKind::Weight => &WEIGHTS,
                    FieldKind::FreeText => &[],
                };
                match lookup(table, &value) {
                    Some(en) => LocalizedText { uk: value, en },
                    None => LocalizedText::uniform(value),
                }
            }
        }
    }
}

/// Normalize a stored jsonb value. Legacy rows may hold a bare string where
/// newer rows hold a `{uk, en}` object.
pub fn from_stored(value: serde_json::Value, kind: FieldKind) -> LocalizedText {
    match serde_json::from_value::<LocalizedInput>(value) {
        Ok(input) => input.normalize(kind),
        Err(_) => LocalizedText::uniform(""),
    }
}

pub fn to_stored(text: &LocalizedText) -> serde_json::Value {
    serde_json::json!({ "uk": text.uk, "en": text.en })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_input_passes_through() {
        let input = LocalizedInput::Map {
            uk: "Арабіка Колумбія".into(),
            en: "Arabica Colombia".into(),
        };
        let text = input.normalize(FieldKind::FreeText);
        assert_eq!(text.uk, "Арабіка Колумбія");
        assert_eq!(text.en, "Arabica Colombia");
    }

    #[test]
    fn known_category_is_upgraded() {
        let text = LocalizedInput::Plain("Без кофеїну".into()).normalize(FieldKind::Category);
        assert_eq!(text, LocalizedText::new("Без кофеїну", "Decaf"));
    }

    #[test]
    fn known_type_and_weight_are_upgraded() {
        let t = LocalizedInput::Plain("Мелена".into()).normalize(FieldKind::BeanType);
        assert_eq!(t.en, "Ground");
        let w = LocalizedInput::Plain("1кг".into()).normalize(FieldKind::Weight);
        assert_eq!(w.en, "1kg");
    }

    #[test]
    fn unknown_value_passes_through_in_both_languages() {
        let text = LocalizedInput::Plain("Ефіопія Їргачеф".into()).normalize(FieldKind::Category);
        assert_eq!(text.uk, "Ефіопія Їргачеф");
        assert_eq!(text.en, "Ефіопія Їргачеф");
    }

    #[test]
    fn untagged_deserialization_accepts_both_shapes() {
        let plain: LocalizedInput = serde_json::from_value(serde_json::json!("Зерна")).unwrap();
        assert_eq!(plain.normalize(FieldKind::BeanType).en, "Beans");

        let map: LocalizedInput =
            serde_json::from_value(serde_json::json!({ "uk": "Зерна", "en": "Beans" })).unwrap();
        assert_eq!(map.normalize(FieldKind::BeanType).en, "Beans");
    }

    #[test]
    fn stored_legacy_string_normalizes_on_read() {
        let text = from_stored(serde_json::json!("Робуста"), FieldKind::Category);
        assert_eq!(text.en, "Robusta");
    }
}
