use std::collections::BTreeMap;

use regex::Regex;
use serde::Deserialize;

use super::controller::{FieldKey, FormError, FormResult};
use super::validation::Rule;

/// Serializable form of the non-custom rules.
///
/// ```toml
/// [[fields.email]]
/// kind = "required"
/// message = "Email is required"
///
/// [[fields.email]]
/// kind = "pattern"
/// value = '^[^\s@]+@[^\s@]+\.[^\s@]+$'
/// message = "Invalid email"
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleSpec {
    Required { message: String },
    MinLength { value: usize, message: String },
    MaxLength { value: usize, message: String },
    Pattern { value: String, message: String },
}

impl RuleSpec {
    pub fn to_rule<V>(&self, key: FieldKey) -> FormResult<Rule<V>> {
        Ok(match self {
            RuleSpec::Required { message } => Rule::required(message.as_str()),
            RuleSpec::MinLength { value, message } => Rule::min_length(*value, message.as_str()),
            RuleSpec::MaxLength { value, message } => Rule::max_length(*value, message.as_str()),
            RuleSpec::Pattern { value, message } => {
                let regex = Regex::new(value).map_err(|error| FormError::InvalidPattern {
                    field: key.to_string(),
                    reason: error.to_string(),
                })?;
                Rule::pattern(regex, message.as_str())
            }
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct RulesConfig {
    #[serde(default)]
    pub fields: BTreeMap<String, Vec<RuleSpec>>,
}

impl RulesConfig {
    pub fn from_toml_str(source: &str) -> FormResult<Self> {
        toml::from_str(source).map_err(|error| FormError::Config(error.to_string()))
    }

    /// Compiled rules for `key`; a field absent from the file has none.
    pub fn rules_for<V>(&self, key: FieldKey) -> FormResult<Vec<Rule<V>>> {
        self.fields
            .get(key.as_str())
            .map(|specs| specs.iter().map(|spec| spec.to_rule(key)).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
