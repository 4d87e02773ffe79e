use std::{collections::HashMap, fmt};

use holidays_common::error::Error;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

/// Prefix of environment entries that override variables,
/// `HOLIDAYS_VAR_PG_CONN` overrides `pg_conn`.
pub const ENV_VAR_PREFIX: &str = "HOLIDAYS_VAR_";

/// Key-value store for connection settings and secrets.
/// ---
/// Values come from the config file and can be overridden from the
/// environment. A variable may be stored either as structured YAML or as
/// a JSON-encoded string, [`VariableStore::get_json`] accepts both.
#[derive(Clone, Default)]
pub struct VariableStore {
    values: HashMap<String, Value>,
    overrides: HashMap<String, String>,
}

impl VariableStore {
    pub fn new(values: HashMap<String, Value>) -> Self {
        Self {
            values,
            overrides: HashMap::new(),
        }
    }

    /// Store with overrides taken from the process environment.
    pub fn from_env(values: HashMap<String, Value>) -> Self {
        Self::new(values).with_overrides(std::env::vars())
    }

    /// Adds overrides from `(NAME, value)` pairs; only `HOLIDAYS_VAR_*` names are kept.
    pub fn with_overrides(mut self, entries: impl IntoIterator<Item = (String, String)>) -> Self {
        for (name, value) in entries {
            if let Some(var_name) = name.strip_prefix(ENV_VAR_PREFIX) {
                self.overrides.insert(var_name.to_lowercase(), value);
            }
        }
        self
    }

    fn lookup(&self, name: &str) -> Option<Value> {
        self.overrides
            .get(name)
            .map(|value| Value::String(value.clone()))
            .or_else(|| self.values.get(name).cloned())
    }

    /// Returns a variable as plain text.
    pub fn get(&self, name: &str) -> Result<String, Error> {
        match self.lookup(name) {
            Some(Value::String(value)) => Ok(value),
            Some(Value::Null) | None => Err(missing_variable(name)),
            Some(other) => Ok(other.to_string()),
        }
    }

    /// Returns a variable deserialized from JSON.
    pub fn get_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, Error> {
        let value = match self.lookup(name) {
            Some(Value::String(raw)) => serde_json::from_str(&raw).map_err(|e| {
                Error::Config(format!("Variable '{name}' is not valid JSON: {e}"))
            })?,
            Some(Value::Null) | None => return Err(missing_variable(name)),
            Some(other) => other,
        };

        serde_json::from_value(value)
            .map_err(|e| Error::Config(format!("Variable '{name}' has an unexpected shape: {e}")))
    }
}

impl fmt::Debug for VariableStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.values.keys().chain(self.overrides.keys()).collect();
        names.sort();
        names.dedup();

        f.debug_struct("VariableStore")
            .field("names", &names)
            .finish()
    }
}

fn missing_variable(name: &str) -> Error {
    Error::Config(format!(
        "Variable '{}' is not set (config `variables.{}` or env {}{})",
        name,
        name,
        ENV_VAR_PREFIX,
        name.to_uppercase()
    ))
}

/// Shape of the `obs_bucket_variables` variable.
#[derive(Debug, Clone, Deserialize)]
pub struct ObsBucketVariables {
    pub obs_endpoint_url: String,
}

/// Shape of the `obs_bucket_keys` variable.
#[derive(Clone, Deserialize)]
pub struct ObsBucketKeys {
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
}

impl fmt::Debug for ObsBucketKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObsBucketKeys")
            .field("aws_access_key_id", &"<redacted>")
            .field("aws_secret_access_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn store() -> VariableStore {
        VariableStore::new(HashMap::from([
            (
                "obs_bucket_variables".to_string(),
                json!({ "obs_endpoint_url": "https://obs.example.net" }),
            ),
            (
                "obs_bucket_keys".to_string(),
                json!(r#"{"aws_access_key_id": "id", "aws_secret_access_key": "secret"}"#),
            ),
            ("pg_conn".to_string(), json!("postgres://file@localhost/db")),
        ]))
    }

    #[test]
    fn test_structured_and_json_string_variables() {
        let store = store();

        let endpoint: ObsBucketVariables = store.get_json("obs_bucket_variables").unwrap();
        assert_eq!(endpoint.obs_endpoint_url, "https://obs.example.net");

        let keys: ObsBucketKeys = store.get_json("obs_bucket_keys").unwrap();
        assert_eq!(keys.aws_access_key_id, "id");
        assert!(!format!("{keys:?}").contains("secret"));
    }

    #[test]
    fn test_environment_overrides_config() {
        let store = store().with_overrides([
            (
                "HOLIDAYS_VAR_PG_CONN".to_string(),
                "postgres://env@db/holidays".to_string(),
            ),
            ("UNRELATED".to_string(), "ignored".to_string()),
        ]);

        assert_eq!(store.get("pg_conn").unwrap(), "postgres://env@db/holidays");
        assert!(store.get("unrelated").is_err());
    }

    #[test]
    fn test_missing_variable_is_config_error() {
        let err = VariableStore::default().get("pg_conn").unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("HOLIDAYS_VAR_PG_CONN")));
    }

    #[test]
    fn test_wrong_shape_is_config_error() {
        let store = VariableStore::new(HashMap::from([(
            "obs_bucket_keys".to_string(),
            json!({ "aws_access_key_id": "id" }),
        )]));

        assert!(matches!(
            store.get_json::<ObsBucketKeys>("obs_bucket_keys"),
            Err(Error::Config(_))
        ));
    }
}
