//! Read-only application context
//!
//! Operations that need cross-cutting settings receive an `AppContext`
//! instead of reaching into a global store by name.

use std::collections::BTreeMap;

use serde_json::Value;
use strum::{Display, EnumString};

use crate::config::ContextConfig;
use crate::http::disguise::HeaderSet;

/// Named value stores available through the context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StateStore {
    Setting,
    Play,
}

#[derive(Debug, Clone, Default)]
pub struct AppContext {
    default_headers: HeaderSet,
    settings: BTreeMap<String, Value>,
    playback: BTreeMap<String, Value>,
}

impl AppContext {
    pub fn new(config: &ContextConfig) -> Self {
        Self {
            default_headers: HeaderSet::from_pairs(
                config
                    .default_headers
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str())),
            ),
            settings: config.settings.clone(),
            playback: config.playback.clone(),
        }
    }

    /// Look up a named value. Falsy values (null, false, 0, "") read as absent.
    pub fn get(&self, store: StateStore, key: &str) -> Option<&Value> {
        let values = match store {
            StateStore::Setting => &self.settings,
            StateStore::Play => &self.playback,
        };
        values.get(key).filter(|value| is_truthy(value))
    }

    pub fn default_headers(&self) -> &HeaderSet {
        &self.default_headers
    }

    /// Caller headers layered over the context defaults; caller wins.
    pub fn headers_for(&self, caller: &HeaderSet) -> HeaderSet {
        let mut merged = self.default_headers.clone();
        merged.extend(caller.iter().map(|(name, value)| (name.to_string(), value.to_string())));
        merged
    }
}

/// JavaScript-style truthiness for JSON values
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn context() -> AppContext {
        let mut config = ContextConfig::default();
        config.default_headers.insert("User-Agent".into(), "Default/1.0".into());
        config.default_headers.insert("Accept".into(), "*/*".into());
        config.settings.insert("ua".into(), json!("Mozilla/5.0"));
        config.settings.insert("disabled".into(), json!(false));
        config.playback.insert("volume".into(), json!(0));
        config.playback.insert("rate".into(), json!(1.5));
        AppContext::new(&config)
    }

    #[test]
    fn test_store_names_parse() {
        assert_eq!(StateStore::from_str("setting").unwrap(), StateStore::Setting);
        assert_eq!(StateStore::from_str("Play").unwrap(), StateStore::Play);
        assert!(StateStore::from_str("history").is_err());
    }

    #[test]
    fn test_lookups_hide_falsy_values() {
        let ctx = context();
        assert_eq!(ctx.get(StateStore::Setting, "ua"), Some(&json!("Mozilla/5.0")));
        assert_eq!(ctx.get(StateStore::Setting, "disabled"), None);
        assert_eq!(ctx.get(StateStore::Play, "volume"), None);
        assert_eq!(ctx.get(StateStore::Play, "rate"), Some(&json!(1.5)));
        assert_eq!(ctx.get(StateStore::Play, "ua"), None);
    }

    #[test]
    fn test_caller_headers_override_defaults() {
        let ctx = context();
        let caller = HeaderSet::from_pairs([("USER-AGENT", "Caller/2.0")]);
        let merged = ctx.headers_for(&caller);

        assert_eq!(merged.get("user-agent"), Some("Caller/2.0"));
        assert_eq!(merged.get("accept"), Some("*/*"));
        assert_eq!(merged.len(), 2);
    }
}
