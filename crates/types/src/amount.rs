//! Serde helpers for smallest-unit token amounts
//!
//! Amounts are `u128` and routinely exceed what JSON numbers can carry
//! losslessly, so they are written as decimal strings. Reading accepts both
//! strings and plain integers so hand-written config files stay readable.

use serde::{de, Deserializer, Serializer};
use std::fmt;

struct AmountVisitor;

impl<'de> de::Visitor<'de> for AmountVisitor {
	type Value = u128;

	fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("an unsigned integer or a decimal string")
	}

	fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
		Ok(v as u128)
	}

	fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
		Ok(v)
	}

	fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
		u128::try_from(v).map_err(|_| E::custom(format!("negative amount: {}", v)))
	}

	fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
		v.trim()
			.parse::<u128>()
			.map_err(|e| E::custom(format!("invalid amount '{}': {}", v, e)))
	}
}

/// `#[serde(with = "crate::amount")]` for `u128` fields
pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
	serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
	deserializer.deserialize_any(AmountVisitor)
}

/// `#[serde(with = "crate::amount::option")]` for `Option<u128>` fields
pub mod option {
	use super::AmountVisitor;
	use serde::{de, Deserializer, Serializer};
	use std::fmt;

	pub fn serialize<S: Serializer>(value: &Option<u128>, serializer: S) -> Result<S::Ok, S::Error> {
		match value {
			Some(v) => serializer.serialize_str(&v.to_string()),
			None => serializer.serialize_none(),
		}
	}

	struct OptionVisitor;

	impl<'de> de::Visitor<'de> for OptionVisitor {
		type Value = Option<u128>;

		fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
			f.write_str("an optional amount")
		}

		fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
			Ok(None)
		}

		fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
			Ok(None)
		}

		fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
			d.deserialize_any(AmountVisitor).map(Some)
		}
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u128>, D::Error> {
		deserializer.deserialize_option(OptionVisitor)
	}
}

#[cfg(test)]
mod tests {
	use serde::{Deserialize, Serialize};

	#[derive(Debug, Serialize, Deserialize, PartialEq)]
	struct Holder {
		#[serde(with = "crate::amount")]
		amount: u128,
		#[serde(default, with = "crate::amount::option")]
		minimum: Option<u128>,
	}

	#[test]
	fn test_amount_written_as_string() {
		let holder = Holder {
			amount: 340282366920938463463374607431768211455,
			minimum: Some(1),
		};
		let json = serde_json::to_value(&holder).unwrap();
		assert_eq!(json["amount"], "340282366920938463463374607431768211455");
		assert_eq!(json["minimum"], "1");
	}

	#[test]
	fn test_amount_accepts_numbers_and_strings() {
		let from_number: Holder = serde_json::from_str(r#"{"amount": 42}"#).unwrap();
		assert_eq!(from_number.amount, 42);
		assert_eq!(from_number.minimum, None);

		let from_string: Holder =
			serde_json::from_str(r#"{"amount": "1000000000000000", "minimum": "5"}"#).unwrap();
		assert_eq!(from_string.amount, 1_000_000_000_000_000);
		assert_eq!(from_string.minimum, Some(5));
	}

	#[test]
	fn test_amount_rejects_garbage() {
		assert!(serde_json::from_str::<Holder>(r#"{"amount": "12abc"}"#).is_err());
		assert!(serde_json::from_str::<Holder>(r#"{"amount": -3}"#).is_err());
	}
}
