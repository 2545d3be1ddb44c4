// src/common/serde_ext.rs

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

/// Campo opcional vindo de formulário: `""` (ou só espaços) vira `None`.
///
/// Texto não vazio é lido primeiro como string (enums, e-mail, datas) e,
/// se não servir, como JSON (`"5.5"` vira número).
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => match T::deserialize(Value::String(s.clone())) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => serde_json::from_str(s.trim()).map(Some).map_err(|_| serde::de::Error::custom(e)),
        },
        Some(other) => T::deserialize(other).map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        power: Option<f64>,
        #[serde(default, deserialize_with = "empty_string_as_none")]
        label: Option<String>,
    }

    #[test]
    fn blank_strings_become_none() {
        let form: Form = serde_json::from_value(json!({ "power": "", "label": "  " })).unwrap();
        assert_eq!(form.power, None);
        assert_eq!(form.label, None);
    }

    #[test]
    fn numbers_are_read_from_text_or_json() {
        let form: Form = serde_json::from_value(json!({ "power": "5.5", "label": "x" })).unwrap();
        assert_eq!(form.power, Some(5.5));
        assert_eq!(form.label.as_deref(), Some("x"));

        let form: Form = serde_json::from_value(json!({ "power": 3 })).unwrap();
        assert_eq!(form.power, Some(3.0));
        assert_eq!(form.label, None);
    }

    #[test]
    fn garbage_is_still_an_error() {
        assert!(serde_json::from_value::<Form>(json!({ "power": "muito" })).is_err());
    }
}
