use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ArmoryError, Result};

/// User-supplied values for one launch attempt, keyed by parameter name.
pub type ParameterValues = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Free-text input
    #[default]
    Input,
    /// One of an enumerated set of legal values
    Choice,
    /// Truthy/falsy flag
    Boolean,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSpec {
    #[serde(rename = "type", default)]
    pub kind: ParamKind,

    #[serde(default)]
    pub description: String,

    /// Default value. Catalog files may spell this as a string, bool, or
    /// number; all are normalized to a string at load time.
    #[serde(
        default,
        deserialize_with = "de_default_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl ParameterSpec {
    pub fn input(description: &str) -> Self {
        Self {
            kind: ParamKind::Input,
            description: description.to_string(),
            default: None,
            required: false,
            choices: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    pub fn choice(description: &str, choices: &[&str]) -> Self {
        Self {
            kind: ParamKind::Choice,
            description: description.to_string(),
            default: None,
            required: false,
            choices: choices.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn boolean(description: &str, default: bool) -> Self {
        Self {
            kind: ParamKind::Boolean,
            description: description.to_string(),
            default: Some(if default { "true" } else { "false" }.to_string()),
            required: false,
            choices: Vec::new(),
        }
    }
}

fn de_default_value<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "unsupported default value: {}",
            other
        ))),
    }
}

/// Static description of one security tool: what it is, which binary runs it,
/// and how to build its command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Underlying executable name (may differ from the catalog key).
    pub command: String,

    /// Ordered: parameters are prompted for in declaration order.
    #[serde(default)]
    pub parameters: IndexMap<String, ParameterSpec>,

    /// Template with `{name}` and `{name_flag}` placeholders.
    pub command_template: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

impl ToolSpec {
    /// Check the fields a launch depends on. Run once at catalog load so
    /// schema problems surface as a typed error instead of a failed lookup
    /// deep inside a launch.
    pub fn validate(&self, tool_id: &str) -> Result<()> {
        if self.name.is_empty() {
            return Err(ArmoryError::Config(format!(
                "tool '{}' is missing a name",
                tool_id
            )));
        }
        if self.command.is_empty() {
            return Err(ArmoryError::Config(format!(
                "tool '{}' is missing a command",
                tool_id
            )));
        }
        if self.command_template.trim().is_empty() {
            return Err(ArmoryError::Config(format!(
                "tool '{}' is missing a command template",
                tool_id
            )));
        }
        for (param_name, param) in &self.parameters {
            if param.kind == ParamKind::Choice && param.choices.is_empty() {
                return Err(ArmoryError::Config(format!(
                    "tool '{}': choice parameter '{}' has no choices",
                    tool_id, param_name
                )));
            }
        }
        Ok(())
    }

    /// Apply defaults and validate user input against the parameter schema.
    /// Returns the effective values used for rendering.
    pub fn resolve_values(&self, supplied: &ParameterValues) -> Result<ParameterValues> {
        for name in supplied.keys() {
            if !self.parameters.contains_key(name) {
                return Err(ArmoryError::validation(name, "unknown parameter"));
            }
        }

        let mut resolved = ParameterValues::new();
        for (name, param) in &self.parameters {
            let value = match supplied.get(name).filter(|v| !v.is_empty()) {
                Some(v) => v.clone(),
                None => match &param.default {
                    Some(d) => d.clone(),
                    None if param.required => {
                        return Err(ArmoryError::validation(name, "required parameter missing"));
                    }
                    None => {
                        resolved.insert(name.clone(), String::new());
                        continue;
                    }
                },
            };

            match param.kind {
                ParamKind::Choice => {
                    if !param.choices.iter().any(|c| c == &value) {
                        return Err(ArmoryError::validation(
                            name,
                            format!("must be one of: {}", param.choices.join(", ")),
                        ));
                    }
                }
                ParamKind::Boolean => {
                    let lower = value.to_lowercase();
                    if !matches!(lower.as_str(), "true" | "yes" | "1" | "false" | "no" | "0") {
                        return Err(ArmoryError::validation(
                            name,
                            "boolean value required (true/false)",
                        ));
                    }
                }
                ParamKind::Input => {}
            }

            resolved.insert(name.clone(), value);
        }
        Ok(resolved)
    }
}

/// One group of related tools in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tools: IndexMap<String, ToolSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_with_params(params: &[(&str, ParameterSpec)]) -> ToolSpec {
        ToolSpec {
            name: "nmap".into(),
            description: "scanner".into(),
            command: "nmap".into(),
            parameters: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            command_template: "nmap {target}".into(),
            examples: vec![],
        }
    }

    #[test]
    fn resolve_applies_defaults() {
        let spec = spec_with_params(&[(
            "ports",
            ParameterSpec::input("Port range").with_default("1-1000"),
        )]);
        let resolved = spec.resolve_values(&ParameterValues::new()).unwrap();
        assert_eq!(resolved.get("ports").unwrap(), "1-1000");
    }

    #[test]
    fn resolve_rejects_missing_required() {
        let spec = spec_with_params(&[("target", ParameterSpec::input("Target").required())]);
        let err = spec.resolve_values(&ParameterValues::new()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::ArmoryError::Validation { .. }
        ));
    }

    #[test]
    fn resolve_rejects_bad_choice() {
        let spec = spec_with_params(&[(
            "mode",
            ParameterSpec::choice("Mode", &["dir", "dns", "vhost"]),
        )]);
        let mut values = ParameterValues::new();
        values.insert("mode".into(), "fuzz".into());
        assert!(spec.resolve_values(&values).is_err());
    }

    #[test]
    fn resolve_rejects_bad_boolean() {
        let spec = spec_with_params(&[("batch", ParameterSpec::boolean("Batch mode", true))]);
        let mut values = ParameterValues::new();
        values.insert("batch".into(), "maybe".into());
        assert!(spec.resolve_values(&values).is_err());
    }

    #[test]
    fn resolve_accepts_boolean_tokens_any_case() {
        let spec = spec_with_params(&[("batch", ParameterSpec::boolean("Batch mode", true))]);
        for token in ["TRUE", "Yes", "1", "False", "NO", "0"] {
            let mut values = ParameterValues::new();
            values.insert("batch".into(), token.into());
            assert!(spec.resolve_values(&values).is_ok(), "token {}", token);
        }
    }

    #[test]
    fn resolve_rejects_unknown_parameter() {
        let spec = spec_with_params(&[]);
        let mut values = ParameterValues::new();
        values.insert("bogus".into(), "x".into());
        assert!(spec.resolve_values(&values).is_err());
    }

    #[test]
    fn optional_parameter_without_default_resolves_empty() {
        let spec = spec_with_params(&[("data", ParameterSpec::input("POST data"))]);
        let resolved = spec.resolve_values(&ParameterValues::new()).unwrap();
        assert_eq!(resolved.get("data").unwrap(), "");
    }

    #[test]
    fn validate_rejects_empty_template() {
        let mut spec = spec_with_params(&[]);
        spec.command_template = "  ".into();
        assert!(spec.validate("nmap").is_err());
    }

    #[test]
    fn default_value_accepts_bool_and_number_json() {
        let json = r#"{
            "type": "boolean",
            "description": "batch",
            "default": true
        }"#;
        let param: ParameterSpec = serde_json::from_str(json).unwrap();
        assert_eq!(param.default.as_deref(), Some("true"));

        let json = r#"{ "type": "input", "default": 10 }"#;
        let param: ParameterSpec = serde_json::from_str(json).unwrap();
        assert_eq!(param.default.as_deref(), Some("10"));
    }
}
