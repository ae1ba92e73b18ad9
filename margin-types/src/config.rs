//! Plugin settings: the two persisted fields and their merge rules.
//!
//! Persistence itself is host-provided; this module owns the shape of the
//! stored data, the defaults, and the merge semantics on load.

use serde::{Deserialize, Serialize};

/// Default base URL of a locally running Ollama server.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default model identifier used until the user picks one.
pub const DEFAULT_MODEL_NAME: &str = "llama2";

/// User-editable settings, persisted by the host.
///
/// Wire names match the stored form (`ollamaUrl`, `modelName`). Fields
/// missing from the stored data fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Base URL of the Ollama server.
    pub ollama_url: String,
    /// Model identifier sent with every generation request.
    pub model_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.into(),
            model_name: DEFAULT_MODEL_NAME.into(),
        }
    }
}

impl Settings {
    /// Load settings from whatever the host persisted, merged over defaults.
    ///
    /// Missing fields take their default value. Data that does not parse at
    /// all yields the full defaults.
    #[must_use]
    pub fn from_saved(data: serde_json::Value) -> Self {
        serde_json::from_value(data).unwrap_or_default()
    }

    /// Reconcile the selected model against the server's model list.
    ///
    /// Keeps the current model when the server still lists it; otherwise
    /// switches to the first listed model, or leaves the selection alone
    /// when the list is empty. Returns whether the selection changed, so
    /// the host knows to save.
    pub fn reconcile_model(&mut self, available: &[String]) -> bool {
        if available.iter().any(|name| *name == self.model_name) {
            return false;
        }
        match available.first() {
            Some(first) => {
                self.model_name = first.clone();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_point_at_local_server() {
        let settings = Settings::default();
        assert_eq!(settings.ollama_url, "http://localhost:11434");
        assert_eq!(settings.model_name, "llama2");
    }

    #[test]
    fn from_saved_merges_partial_data_over_defaults() {
        let settings = Settings::from_saved(json!({ "modelName": "mistral" }));
        assert_eq!(settings.ollama_url, DEFAULT_OLLAMA_URL);
        assert_eq!(settings.model_name, "mistral");
    }

    #[test]
    fn from_saved_reads_both_fields() {
        let settings = Settings::from_saved(json!({
            "ollamaUrl": "http://remote:11434",
            "modelName": "llama3.1",
        }));
        assert_eq!(settings.ollama_url, "http://remote:11434");
        assert_eq!(settings.model_name, "llama3.1");
    }

    #[test]
    fn from_saved_falls_back_to_defaults_on_garbage() {
        assert_eq!(Settings::from_saved(json!("not an object")), Settings::default());
        assert_eq!(Settings::from_saved(json!(null)), Settings::default());
    }

    #[test]
    fn from_saved_ignores_unknown_fields() {
        let settings = Settings::from_saved(json!({
            "modelName": "phi3",
            "somethingElse": 42,
        }));
        assert_eq!(settings.model_name, "phi3");
    }

    #[test]
    fn round_trips_with_camel_case_wire_names() {
        let value = serde_json::to_value(Settings::default()).expect("serializes");
        assert!(value.get("ollamaUrl").is_some());
        assert!(value.get("modelName").is_some());
    }

    #[test]
    fn reconcile_keeps_listed_model() {
        let mut settings = Settings::default();
        let available = vec!["mistral".to_string(), "llama2".to_string()];
        assert!(!settings.reconcile_model(&available));
        assert_eq!(settings.model_name, "llama2");
    }

    #[test]
    fn reconcile_switches_to_first_when_missing() {
        let mut settings = Settings::default();
        let available = vec!["mistral".to_string(), "phi3".to_string()];
        assert!(settings.reconcile_model(&available));
        assert_eq!(settings.model_name, "mistral");
    }

    #[test]
    fn reconcile_leaves_selection_on_empty_list() {
        let mut settings = Settings::default();
        assert!(!settings.reconcile_model(&[]));
        assert_eq!(settings.model_name, "llama2");
    }
}
