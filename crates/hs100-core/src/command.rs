//! Command documents.
//!
//! A command addresses one action of one module and carries an argument
//! object: `{"<module>":{"<action>":{...arguments}}}`. Documents are built
//! as `serde_json` values, so string arguments are always escaped.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Error;

/// One module/action request with its arguments.
///
/// Built once per call and not modified afterwards.
///
/// # Example
///
/// ```
/// use hs100_core::command::Command;
///
/// let cmd = Command::new("system", "set_relay_state").arg("state", 1);
/// assert_eq!(cmd.to_json(), r#"{"system":{"set_relay_state":{"state":1}}}"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    module: String,
    action: String,
    arguments: Map<String, Value>,
}

impl Command {
    /// Creates a command with an empty argument object.
    pub fn new(module: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            action: action.into(),
            arguments: Map::new(),
        }
    }

    /// Creates a command from an argument value.
    ///
    /// `arguments` must be a JSON object; `null` is treated as no arguments.
    pub fn with_arguments(
        module: impl Into<String>,
        action: impl Into<String>,
        arguments: Value,
    ) -> Result<Self, Error> {
        let arguments = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(Error::Encode(format!(
                    "arguments must be an object, got {}",
                    other
                )));
            }
        };
        Ok(Self {
            module: module.into(),
            action: action.into(),
            arguments,
        })
    }

    /// Creates a command whose arguments are the serialized `params`.
    pub fn from_params<P: Serialize>(
        module: impl Into<String>,
        action: impl Into<String>,
        params: &P,
    ) -> Result<Self, Error> {
        let value = serde_json::to_value(params).map_err(|e| Error::Encode(e.to_string()))?;
        Self::with_arguments(module, action, value)
    }

    /// Adds one named argument.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Module name, e.g. `system`.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Action name, e.g. `set_relay_state`.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Argument object.
    pub fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    /// Returns the full document as a JSON value.
    pub fn to_document(&self) -> Value {
        let mut action = Map::new();
        action.insert(self.action.clone(), Value::Object(self.arguments.clone()));
        let mut module = Map::new();
        module.insert(self.module.clone(), Value::Object(action));
        Value::Object(module)
    }

    /// Renders the document text sent to the device.
    pub fn to_json(&self) -> String {
        self.to_document().to_string()
    }
}

/// Renders `{module: {action: arguments}}` as document text.
///
/// # Example
///
/// ```
/// use hs100_core::command::build;
/// use serde_json::json;
///
/// let text = build("system", "set_dev_alias", json!({"alias": "Desk \"lamp\""})).unwrap();
/// let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
/// assert_eq!(doc["system"]["set_dev_alias"]["alias"], "Desk \"lamp\"");
/// ```
pub fn build(module: &str, action: &str, arguments: Value) -> Result<String, Error> {
    Ok(Command::with_arguments(module, action, arguments)?.to_json())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_build_relay_state() {
        let text = build("system", "set_relay_state", json!({"state": 1})).unwrap();
        assert_eq!(
            parse(&text),
            json!({"system": {"set_relay_state": {"state": 1}}})
        );
    }

    #[test]
    fn test_empty_arguments() {
        let cmd = Command::new("time", "get_time");
        assert_eq!(cmd.to_json(), r#"{"time":{"get_time":{}}}"#);

        let text = build("netif", "get_scaninfo", Value::Null).unwrap();
        assert_eq!(text, r#"{"netif":{"get_scaninfo":{}}}"#);
    }

    #[test]
    fn test_rejects_non_object_arguments() {
        let err = build("system", "reboot", json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
    }

    #[test]
    fn test_strings_are_escaped() {
        let cmd = Command::new("netif", "set_stainfo")
            .arg("ssid", "Cafe \"Wifi\"\n")
            .arg("password", "back\\slash");
        let doc = parse(&cmd.to_json());
        assert_eq!(doc["netif"]["set_stainfo"]["ssid"], "Cafe \"Wifi\"\n");
        assert_eq!(doc["netif"]["set_stainfo"]["password"], "back\\slash");
    }

    #[test]
    fn test_native_types() {
        let cmd = Command::new("schedule", "add_rule")
            .arg("enable", 1)
            .arg("name", "n")
            .arg("wday", json!([0, 1, 0, 0, 0, 0, 0]))
            .arg("flag", true);
        let args = &parse(&cmd.to_json())["schedule"]["add_rule"];
        assert!(args["enable"].is_u64());
        assert!(args["name"].is_string());
        assert!(args["wday"].is_array());
        assert!(args["flag"].is_boolean());
    }

    #[test]
    fn test_from_params() {
        #[derive(Serialize)]
        struct Alias<'a> {
            alias: &'a str,
        }

        let cmd = Command::from_params("system", "set_dev_alias", &Alias { alias: "Lamp" }).unwrap();
        assert_eq!(cmd.module(), "system");
        assert_eq!(cmd.action(), "set_dev_alias");
        assert_eq!(cmd.arguments()["alias"], "Lamp");
    }
}
