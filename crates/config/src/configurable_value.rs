//! Values that are either written inline or read from an environment variable
//!
//! Accepted forms in config files:
//! - `{"type": "env", "value": "INDEXER_API_KEY"}`
//! - `{"type": "plain", "value": "abc"}`
//! - `"env:INDEXER_API_KEY"` or `"abc"`

use polar_types::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ConfigurableValue {
	#[serde(rename = "type")]
	pub value_type: ValueType,
	/// Environment variable name or the literal value
	pub value: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
	Env,
	Plain,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurableValueError {
	#[error("Environment variable '{0}' not found")]
	EnvironmentVariableNotFound(String),

	#[error("Value resolved from {0} is empty")]
	Empty(String),
}

impl ConfigurableValue {
	pub fn from_env(var: &str) -> Self {
		Self {
			value_type: ValueType::Env,
			value: var.to_string(),
		}
	}

	pub fn from_plain(value: &str) -> Self {
		Self {
			value_type: ValueType::Plain,
			value: value.to_string(),
		}
	}

	pub fn resolve(&self) -> Result<String, ConfigurableValueError> {
		let resolved = match self.value_type {
			ValueType::Env => std::env::var(&self.value)
				.map_err(|_| ConfigurableValueError::EnvironmentVariableNotFound(self.value.clone()))?,
			ValueType::Plain => self.value.clone(),
		};
		if resolved.is_empty() {
			return Err(ConfigurableValueError::Empty(self.description()));
		}
		Ok(resolved)
	}

	pub fn resolve_secret(&self) -> Result<SecretString, ConfigurableValueError> {
		self.resolve().map(SecretString::new)
	}

	/// Where the value comes from, safe to log
	pub fn description(&self) -> String {
		match self.value_type {
			ValueType::Env => format!("environment variable '{}'", self.value),
			ValueType::Plain => "inline value".to_string(),
		}
	}
}

impl fmt::Display for ConfigurableValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.value_type {
			ValueType::Env => write!(f, "env:{}", self.value),
			ValueType::Plain => f.write_str("plain:[REDACTED]"),
		}
	}
}

impl From<&str> for ConfigurableValue {
	fn from(value: &str) -> Self {
		match value.strip_prefix("env:") {
			Some(var) => Self::from_env(var),
			None => Self::from_plain(value),
		}
	}
}

impl<'de> Deserialize<'de> for ConfigurableValue {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Repr {
			Tagged {
				#[serde(rename = "type")]
				value_type: ValueType,
				value: String,
			},
			Short(String),
		}

		Ok(match Repr::deserialize(deserializer)? {
			Repr::Tagged { value_type, value } => Self { value_type, value },
			Repr::Short(text) => Self::from(text.as_str()),
		})
	}
}
