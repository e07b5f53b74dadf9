//! Value type registry
//!
//! Stored overrides are kept as type-erased strings. [`SettingType`] knows how
//! to cast such a string back into a native [`SettingValue`], and how to turn
//! a caller-supplied value into its storable form.

use serde::{Deserialize, Serialize};

use crate::error::{ClResult, Error};

/// Declared type of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
	String,
	Boolean,
	Integer,
	Float,
	Json,
}

/// Native setting value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)] // No type tag - type comes from the SettingDefinition
pub enum SettingValue {
	#[default]
	Null,
	Bool(bool), // Must be before Int to avoid bool -> int coercion
	Int(i64),
	Float(f64),
	String(String),
	Json(serde_json::Value),
}

impl SettingValue {
	pub fn is_null(&self) -> bool {
		matches!(self, SettingValue::Null)
	}

	/// Get the type name for error messages
	pub fn type_name(&self) -> &'static str {
		match self {
			SettingValue::Null => "null",
			SettingValue::Bool(_) => "bool",
			SettingValue::Int(_) => "int",
			SettingValue::Float(_) => "float",
			SettingValue::String(_) => "string",
			SettingValue::Json(_) => "json",
		}
	}

	pub fn to_json(&self) -> serde_json::Value {
		match self {
			SettingValue::Null => serde_json::Value::Null,
			SettingValue::Bool(b) => serde_json::Value::Bool(*b),
			SettingValue::Int(i) => serde_json::Value::from(*i),
			SettingValue::Float(f) => serde_json::Value::from(*f),
			SettingValue::String(s) => serde_json::Value::String(s.clone()),
			SettingValue::Json(j) => j.clone(),
		}
	}
}

impl From<serde_json::Value> for SettingValue {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => SettingValue::Null,
			serde_json::Value::Bool(b) => SettingValue::Bool(b),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => SettingValue::Int(i),
				None => match n.as_f64() {
					Some(f) => SettingValue::Float(f),
					None => SettingValue::Json(serde_json::Value::Number(n)),
				},
			},
			serde_json::Value::String(s) => SettingValue::String(s),
			other => SettingValue::Json(other),
		}
	}
}

impl From<&str> for SettingValue {
	fn from(s: &str) -> Self {
		SettingValue::String(s.to_string())
	}
}

impl From<String> for SettingValue {
	fn from(s: String) -> Self {
		SettingValue::String(s)
	}
}

impl From<bool> for SettingValue {
	fn from(b: bool) -> Self {
		SettingValue::Bool(b)
	}
}

impl From<i64> for SettingValue {
	fn from(i: i64) -> Self {
		SettingValue::Int(i)
	}
}

impl From<f64> for SettingValue {
	fn from(f: f64) -> Self {
		SettingValue::Float(f)
	}
}

fn parse_bool(raw: &str) -> Option<bool> {
	let raw = raw.trim();
	match raw.to_ascii_lowercase().as_str() {
		"" | "0" | "false" | "off" | "no" => Some(false),
		"1" | "true" | "on" | "yes" => Some(true),
		_ => raw.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f != 0.0),
	}
}

impl SettingType {
	pub fn as_str(self) -> &'static str {
		match self {
			SettingType::String => "string",
			SettingType::Boolean => "boolean",
			SettingType::Integer => "integer",
			SettingType::Float => "float",
			SettingType::Json => "json",
		}
	}

	/// Zero value returned when an empty string is cast
	pub fn zero_value(self) -> SettingValue {
		match self {
			SettingType::String => SettingValue::String(String::new()),
			SettingType::Boolean => SettingValue::Bool(false),
			SettingType::Integer => SettingValue::Int(0),
			SettingType::Float => SettingValue::Float(0.0),
			SettingType::Json => SettingValue::Null,
		}
	}

	/// Cast a stored string into its native value
	pub fn cast(self, raw: &str) -> ClResult<SettingValue> {
		if raw.is_empty() {
			return Ok(self.zero_value());
		}
		match self {
			SettingType::String => Ok(SettingValue::String(raw.to_string())),
			SettingType::Boolean => parse_bool(raw)
				.map(SettingValue::Bool)
				.ok_or_else(|| Error::type_cast(self, format!("'{}' is not a boolean", raw))),
			SettingType::Integer => raw
				.trim()
				.parse::<i64>()
				.map(SettingValue::Int)
				.map_err(|_| Error::type_cast(self, format!("'{}' is not an integer", raw))),
			SettingType::Float => raw
				.trim()
				.parse::<f64>()
				.ok()
				.filter(|f| f.is_finite())
				.map(SettingValue::Float)
				.ok_or_else(|| Error::type_cast(self, format!("'{}' is not a number", raw))),
			SettingType::Json => serde_json::from_str::<serde_json::Value>(raw)
				.map(SettingValue::Json)
				.map_err(|err| Error::type_cast(self, err.to_string())),
		}
	}

	/// Coerce a caller-supplied value into this type's native representation.
	///
	/// Null passes through unchanged for every type.
	pub fn coerce(self, value: SettingValue) -> ClResult<SettingValue> {
		let mismatch =
			|v: &SettingValue| Error::type_cast(self, format!("got {}", v.type_name()));
		match (self, value) {
			(_, SettingValue::Null) => Ok(SettingValue::Null),

			(SettingType::String, SettingValue::String(s)) => Ok(SettingValue::String(s)),
			(SettingType::String, SettingValue::Bool(b)) => {
				Ok(SettingValue::String((if b { "1" } else { "0" }).to_string()))
			}
			(SettingType::String, SettingValue::Int(i)) => Ok(SettingValue::String(i.to_string())),
			(SettingType::String, SettingValue::Float(f)) => {
				Ok(SettingValue::String(f.to_string()))
			}
			(SettingType::String, SettingValue::Json(serde_json::Value::String(s))) => {
				Ok(SettingValue::String(s))
			}

			(SettingType::Boolean, SettingValue::Bool(b)) => Ok(SettingValue::Bool(b)),
			(SettingType::Boolean, SettingValue::Int(i)) => Ok(SettingValue::Bool(i != 0)),
			(SettingType::Boolean, SettingValue::Float(f)) => Ok(SettingValue::Bool(f != 0.0)),
			(SettingType::Boolean, SettingValue::String(s)) => self.cast(&s),
			(SettingType::Boolean, SettingValue::Json(serde_json::Value::Bool(b))) => {
				Ok(SettingValue::Bool(b))
			}

			(SettingType::Integer, SettingValue::Int(i)) => Ok(SettingValue::Int(i)),
			(SettingType::Integer, SettingValue::Bool(b)) => Ok(SettingValue::Int(i64::from(b))),
			(SettingType::Integer, SettingValue::Float(f)) => float_to_int(f)
				.map(SettingValue::Int)
				.ok_or_else(|| Error::type_cast(self, format!("{} is not a whole number", f))),
			(SettingType::Integer, SettingValue::String(s)) => self.cast(&s),
			(SettingType::Integer, SettingValue::Json(serde_json::Value::Number(n))) => n
				.as_i64()
				.map(SettingValue::Int)
				.ok_or_else(|| Error::type_cast(self, format!("{} is not an integer", n))),

			(SettingType::Float, SettingValue::Float(f)) => Ok(SettingValue::Float(f)),
			#[allow(clippy::cast_precision_loss)]
			(SettingType::Float, SettingValue::Int(i)) => Ok(SettingValue::Float(i as f64)),
			(SettingType::Float, SettingValue::Bool(b)) => {
				Ok(SettingValue::Float(if b { 1.0 } else { 0.0 }))
			}
			(SettingType::Float, SettingValue::String(s)) => self.cast(&s),
			(SettingType::Float, SettingValue::Json(serde_json::Value::Number(n))) => n
				.as_f64()
				.map(SettingValue::Float)
				.ok_or_else(|| Error::type_cast(self, format!("{} is not a number", n))),

			(SettingType::Json, SettingValue::Json(j)) => Ok(SettingValue::Json(j)),
			(SettingType::Json, other) => Ok(SettingValue::Json(other.to_json())),

			(_, other) => Err(mismatch(&other)),
		}
	}

	/// Serialize a value into the type-erased storage form.
	///
	/// Null always serializes to the empty string.
	pub fn serialize(self, value: &SettingValue) -> ClResult<String> {
		Ok(match self.coerce(value.clone())? {
			SettingValue::Null => String::new(),
			SettingValue::Bool(b) => (if b { "1" } else { "0" }).to_string(),
			SettingValue::Int(i) => i.to_string(),
			SettingValue::Float(f) => f.to_string(),
			SettingValue::String(s) => s,
			SettingValue::Json(j) => {
				serde_json::to_string(&j).map_err(|err| Error::type_cast(self, err.to_string()))?
			}
		})
	}
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn float_to_int(f: f64) -> Option<i64> {
	if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
		Some(f as i64)
	} else {
		None
	}
}

impl std::fmt::Display for SettingType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::str::FromStr for SettingType {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"string" => Ok(SettingType::String),
			"boolean" | "bool" => Ok(SettingType::Boolean),
			"integer" | "int" => Ok(SettingType::Integer),
			"float" => Ok(SettingType::Float),
			"json" => Ok(SettingType::Json),
			other => Err(Error::ConfigError(format!("unknown setting type '{}'", other))),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_cast_empty_yields_zero_value() {
		assert_eq!(SettingType::Boolean.cast("").unwrap(), SettingValue::Bool(false));
		assert_eq!(SettingType::Integer.cast("").unwrap(), SettingValue::Int(0));
		assert_eq!(SettingType::Float.cast("").unwrap(), SettingValue::Float(0.0));
		assert_eq!(SettingType::Json.cast("").unwrap(), SettingValue::Null);
		assert_eq!(SettingType::String.cast("").unwrap(), SettingValue::String(String::new()));
	}

	#[test]
	fn test_cast_boolean() {
		assert_eq!(SettingType::Boolean.cast("1").unwrap(), SettingValue::Bool(true));
		assert_eq!(SettingType::Boolean.cast("TRUE").unwrap(), SettingValue::Bool(true));
		assert_eq!(SettingType::Boolean.cast("off").unwrap(), SettingValue::Bool(false));
		assert_eq!(SettingType::Boolean.cast("2").unwrap(), SettingValue::Bool(true));
		assert!(matches!(SettingType::Boolean.cast("maybe"), Err(Error::TypeCast { .. })));
	}

	#[test]
	fn test_cast_numeric_failure_is_an_error() {
		assert!(matches!(SettingType::Integer.cast("abc"), Err(Error::TypeCast { .. })));
		assert!(matches!(SettingType::Float.cast("1.2.3"), Err(Error::TypeCast { .. })));
		assert!(matches!(SettingType::Float.cast("NaN"), Err(Error::TypeCast { .. })));
		assert_eq!(SettingType::Integer.cast(" 42 ").unwrap(), SettingValue::Int(42));
		assert_eq!(SettingType::Float.cast("2.5").unwrap(), SettingValue::Float(2.5));
	}

	#[test]
	fn test_cast_json() {
		let value = SettingType::Json.cast(r#"{"a":[1,2]}"#).unwrap();
		assert_eq!(value, SettingValue::Json(json!({"a": [1, 2]})));
		assert!(matches!(SettingType::Json.cast("{oops"), Err(Error::TypeCast { .. })));
	}

	#[test]
	fn test_serialize_null_is_empty() {
		for typ in [
			SettingType::String,
			SettingType::Boolean,
			SettingType::Integer,
			SettingType::Float,
			SettingType::Json,
		] {
			assert_eq!(typ.serialize(&SettingValue::Null).unwrap(), "");
		}
	}

	#[test]
	fn test_serialize_then_cast_is_exact() {
		let cases = [
			(SettingType::Boolean, SettingValue::Bool(true)),
			(SettingType::Boolean, SettingValue::Bool(false)),
			(SettingType::Integer, SettingValue::Int(-17)),
			(SettingType::Float, SettingValue::Float(0.1)),
			(SettingType::String, SettingValue::String("es".into())),
			(SettingType::Json, SettingValue::Json(json!([{"day": "Monday"}]))),
		];
		for (typ, value) in cases {
			let raw = typ.serialize(&value).unwrap();
			assert_eq!(typ.cast(&raw).unwrap(), value, "{} via {:?}", typ, raw);
		}
	}

	#[test]
	fn test_coerce_across_types() {
		assert_eq!(
			SettingType::Integer.coerce(SettingValue::String("12".into())).unwrap(),
			SettingValue::Int(12)
		);
		assert_eq!(SettingType::Float.coerce(SettingValue::Int(3)).unwrap(), SettingValue::Float(3.0));
		assert_eq!(
			SettingType::Json.coerce(SettingValue::Int(3)).unwrap(),
			SettingValue::Json(json!(3))
		);
		assert!(SettingType::Integer.coerce(SettingValue::Float(1.5)).is_err());
		assert!(SettingType::String.coerce(SettingValue::Json(json!({"a": 1}))).is_err());
	}

	#[test]
	fn test_untagged_deserialize() {
		let v: SettingValue = serde_json::from_str("null").unwrap();
		assert_eq!(v, SettingValue::Null);
		let v: SettingValue = serde_json::from_str("true").unwrap();
		assert_eq!(v, SettingValue::Bool(true));
		let v: SettingValue = serde_json::from_str("7").unwrap();
		assert_eq!(v, SettingValue::Int(7));
		let v: SettingValue = serde_json::from_str("7.5").unwrap();
		assert_eq!(v, SettingValue::Float(7.5));
		let v: SettingValue = serde_json::from_str("[1]").unwrap();
		assert_eq!(v, SettingValue::Json(json!([1])));
	}
}

// vim: ts=4
