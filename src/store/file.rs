// On-disk form of the theme store: `{ "name": ["keyword", ...], ... }`.
//
// Serialized by hand through serde's map API so the key order is exactly
// the theme order.

use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::Theme;

/// Owned theme list read from disk.
pub(super) struct ThemeFile(pub Vec<Theme>);

/// Borrowed theme list written to disk.
pub(super) struct ThemeFileRef<'a>(&'a [Theme]);

impl ThemeFile {
    pub fn borrowed(themes: &[Theme]) -> ThemeFileRef<'_> {
        ThemeFileRef(themes)
    }
}

impl Serialize for ThemeFileRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for theme in self.0 {
            map.serialize_entry(&theme.name, &theme.keywords)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ThemeFile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ThemeFileVisitor)
    }
}

struct ThemeFileVisitor;

impl<'de> Visitor<'de> for ThemeFileVisitor {
    type Value = ThemeFile;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping theme names to keyword arrays")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut themes: Vec<Theme> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, keywords)) = access.next_entry::<String, Vec<String>>()? {
            if themes.iter().any(|t| t.name == name) {
                return Err(serde::de::Error::custom(format!("duplicate theme {name}")));
            }
            if keywords.is_empty() {
                return Err(serde::de::Error::custom(format!(
                    "theme {name} has no keywords"
                )));
            }
            themes.push(Theme::new(name, keywords));
        }
        Ok(ThemeFile(themes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_key_order() {
        let json = r#"{"Лето": ["солнц"], "Зима": ["снег"], "Осень": ["лист"]}"#;
        let ThemeFile(themes) = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = themes.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Лето", "Зима", "Осень"]);
    }

    #[test]
    fn test_writes_non_ascii_verbatim() {
        let themes = vec![Theme::new("спорт", vec!["мяч".to_string()])];
        let json = serde_json::to_string(&ThemeFile::borrowed(&themes)).unwrap();
        assert_eq!(json, r#"{"спорт":["мяч"]}"#);
    }

    #[test]
    fn test_rejects_wrong_shapes() {
        assert!(serde_json::from_str::<ThemeFile>("[]").is_err());
        assert!(serde_json::from_str::<ThemeFile>(r#"{"a": "b"}"#).is_err());
        assert!(serde_json::from_str::<ThemeFile>(r#"{"a": [1, 2]}"#).is_err());
        assert!(serde_json::from_str::<ThemeFile>(r#"{"a": ["x"], "a": ["y"]}"#).is_err());
    }

    #[test]
    fn test_rejects_theme_without_keywords() {
        let err = serde_json::from_str::<ThemeFile>(r#"{"a": ["x"], "b": []}"#)
            .err()
            .unwrap();
        assert!(err.to_string().contains("theme b has no keywords"));
    }
}
