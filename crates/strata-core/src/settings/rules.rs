//! Validation rule expressions
//!
//! A definition's validation rule is a `|`-separated list such as
//! `nullable|integer|min:0` or `in:en,es,fr`. It is parsed once when the
//! catalog is built, so a malformed rule fails at startup rather than on the
//! first write.
//!
//! A `regex:` rule must come last: everything after it is the pattern, so
//! alternation such as `regex:/^(a|b)$/` survives the `|` split.

use regex::Regex;
use std::sync::LazyLock;

use crate::prelude::*;

#[derive(Debug, Clone)]
enum Rule {
	Required,
	String,
	Integer,
	Numeric,
	Boolean,
	Array,
	Json,
	Email,
	Timezone,
	Url,
	Min(f64),
	Max(f64),
	Decimal(usize),
	In(Vec<String>),
	Regex(Regex),
}

/// Parsed validation rules of one setting
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
	rules: Vec<Rule>,
	nullable: bool,
}

static EMAIL_RE: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());
static TIMEZONE_RE: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"^(UTC|GMT|[A-Za-z_]+(/[A-Za-z0-9_+\-]+){1,2})$").ok());
static URL_RE: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").ok());

fn parse_number(rule: &str, arg: Option<&str>) -> ClResult<f64> {
	arg.and_then(|a| a.trim().parse::<f64>().ok()).ok_or_else(|| {
		Error::ConfigError(format!("rule '{}' needs a numeric argument", rule))
	})
}

/// Accepts both `pattern` and the delimited `/pattern/flags` form
fn parse_regex(arg: &str) -> ClResult<Regex> {
	let pattern = match (arg.strip_prefix('/'), arg.rfind('/')) {
		(Some(_), Some(end)) if end > 0 => {
			let flags = &arg[end + 1..];
			let body = &arg[1..end];
			if flags.contains('i') { format!("(?i){}", body) } else { body.to_string() }
		}
		_ => arg.to_string(),
	};
	Regex::new(&pattern).map_err(|err| Error::ConfigError(format!("invalid regex rule: {}", err)))
}

/// Split off a trailing `regex:` rule, whose pattern may itself contain `|`
fn split_regex_tail(expr: &str) -> (&str, Option<&str>) {
	let mut offset = 0;
	for part in expr.split('|') {
		if part.trim_start().starts_with("regex:") {
			let start = offset + (part.len() - part.trim_start().len()) + "regex:".len();
			return (&expr[..offset], Some(expr[start..].trim()));
		}
		offset += part.len() + 1;
	}
	(expr, None)
}

impl RuleSet {
	pub fn parse(expr: &str) -> ClResult<Self> {
		let mut set = RuleSet::default();
		let (head, regex_tail) = split_regex_tail(expr);
		for part in head.split('|').map(str::trim).filter(|p| !p.is_empty()) {
			let (name, arg) = match part.split_once(':') {
				Some((name, arg)) => (name.trim(), Some(arg)),
				None => (part, None),
			};
			let rule = match name {
				"nullable" => {
					set.nullable = true;
					continue;
				}
				"required" => Rule::Required,
				"string" => Rule::String,
				"integer" => Rule::Integer,
				"numeric" => Rule::Numeric,
				"boolean" => Rule::Boolean,
				"array" => Rule::Array,
				"json" => Rule::Json,
				"email" => Rule::Email,
				"timezone" => Rule::Timezone,
				"url" => Rule::Url,
				"min" => Rule::Min(parse_number(name, arg)?),
				"max" => Rule::Max(parse_number(name, arg)?),
				"decimal" => Rule::Decimal(
					arg.and_then(|a| a.trim().parse::<usize>().ok()).ok_or_else(|| {
						Error::ConfigError("rule 'decimal' needs a place count".into())
					})?,
				),
				"in" => Rule::In(
					arg.unwrap_or_default().split(',').map(|v| v.trim().to_string()).collect(),
				),
				other => {
					return Err(Error::ConfigError(format!("unknown validation rule '{}'", other)));
				}
			};
			set.rules.push(rule);
		}
		if let Some(pattern) = regex_tail {
			set.rules.push(Rule::Regex(parse_regex(pattern)?));
		}
		Ok(set)
	}

	fn is_numeric_context(&self) -> bool {
		self.rules
			.iter()
			.any(|r| matches!(r, Rule::Integer | Rule::Numeric | Rule::Decimal(_)))
	}

	/// Checks a value, returning a human-readable reason on failure
	pub fn check(&self, value: &SettingValue) -> Result<(), String> {
		if value.is_null() {
			if self.rules.iter().any(|r| matches!(r, Rule::Required)) {
				return Err("a value is required".into());
			}
			if self.nullable || self.rules.is_empty() {
				return Ok(());
			}
			return Err("the value must not be null".into());
		}

		let numeric = self.is_numeric_context();
		for rule in &self.rules {
			check_rule(rule, value, numeric)?;
		}
		Ok(())
	}
}

fn as_text(value: &SettingValue) -> Option<String> {
	match value {
		SettingValue::String(s) => Some(s.clone()),
		SettingValue::Int(i) => Some(i.to_string()),
		SettingValue::Float(f) => Some(f.to_string()),
		SettingValue::Bool(b) => Some((if *b { "1" } else { "0" }).to_string()),
		SettingValue::Null | SettingValue::Json(_) => None,
	}
}

#[allow(clippy::cast_precision_loss)]
fn as_number(value: &SettingValue) -> Option<f64> {
	match value {
		SettingValue::Int(i) => Some(*i as f64),
		SettingValue::Float(f) => Some(*f),
		SettingValue::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
		SettingValue::Json(serde_json::Value::Number(n)) => n.as_f64(),
		_ => None,
	}
}

/// Size used by `min`/`max`: numbers by value, strings by length, arrays by count
#[allow(clippy::cast_precision_loss)]
fn size_of(value: &SettingValue, numeric: bool) -> Option<f64> {
	match value {
		SettingValue::Int(_) | SettingValue::Float(_) => as_number(value),
		SettingValue::String(_) if numeric => as_number(value),
		SettingValue::String(s) => Some(s.chars().count() as f64),
		SettingValue::Json(serde_json::Value::Array(a)) => Some(a.len() as f64),
		SettingValue::Json(serde_json::Value::Object(o)) => Some(o.len() as f64),
		SettingValue::Json(serde_json::Value::Number(n)) => n.as_f64(),
		SettingValue::Json(serde_json::Value::String(s)) => Some(s.chars().count() as f64),
		_ => None,
	}
}

fn matches_text(value: &SettingValue, re: &Regex) -> bool {
	matches!(value, SettingValue::String(s) if re.is_match(s))
}

fn check_rule(rule: &Rule, value: &SettingValue, numeric: bool) -> Result<(), String> {
	let ok = match rule {
		Rule::Required => match value {
			SettingValue::String(s) => !s.trim().is_empty(),
			SettingValue::Json(serde_json::Value::Array(a)) => !a.is_empty(),
			_ => true,
		},
		Rule::String => matches!(value, SettingValue::String(_)),
		Rule::Integer => match value {
			SettingValue::Int(_) => true,
			SettingValue::String(s) => s.trim().parse::<i64>().is_ok(),
			SettingValue::Json(serde_json::Value::Number(n)) => n.is_i64(),
			_ => false,
		},
		Rule::Numeric => as_number(value).is_some(),
		Rule::Boolean => match value {
			SettingValue::Bool(_) => true,
			SettingValue::Int(i) => *i == 0 || *i == 1,
			SettingValue::String(s) => matches!(s.as_str(), "0" | "1" | "true" | "false"),
			_ => false,
		},
		Rule::Array => matches!(
			value,
			SettingValue::Json(serde_json::Value::Array(_) | serde_json::Value::Object(_))
		),
		Rule::Json => match value {
			SettingValue::Json(_) => true,
			SettingValue::String(s) => serde_json::from_str::<serde_json::Value>(s).is_ok(),
			_ => false,
		},
		Rule::Email => EMAIL_RE.as_ref().is_some_and(|re| matches_text(value, re)),
		Rule::Timezone => TIMEZONE_RE.as_ref().is_some_and(|re| matches_text(value, re)),
		Rule::Url => URL_RE.as_ref().is_some_and(|re| matches_text(value, re)),
		Rule::Min(min) => size_of(value, numeric).is_some_and(|size| size >= *min),
		Rule::Max(max) => size_of(value, numeric).is_some_and(|size| size <= *max),
		Rule::Decimal(places) => {
			as_number(value).is_some()
				&& as_text(value).is_some_and(|text| {
					text.trim().split_once('.').is_none_or(|(_, frac)| frac.len() <= *places)
				})
		}
		Rule::In(allowed) => as_text(value).is_some_and(|text| allowed.contains(&text)),
		Rule::Regex(re) => matches_text(value, re),
	};

	if ok {
		return Ok(());
	}
	Err(match rule {
		Rule::Required => "a value is required".into(),
		Rule::String => "the value must be a string".into(),
		Rule::Integer => "the value must be an integer".into(),
		Rule::Numeric => "the value must be a number".into(),
		Rule::Boolean => "the value must be true or false".into(),
		Rule::Array => "the value must be an array".into(),
		Rule::Json => "the value must be valid JSON".into(),
		Rule::Email => "the value must be a valid email address".into(),
		Rule::Timezone => "the value must be a valid timezone".into(),
		Rule::Url => "the value must be a valid URL".into(),
		Rule::Min(min) => format!("the value must be at least {}", min),
		Rule::Max(max) => format!("the value must not be greater than {}", max),
		Rule::Decimal(places) => format!("the value must have at most {} decimal places", places),
		Rule::In(allowed) => format!("the value must be one of: {}", allowed.join(", ")),
		Rule::Regex(_) => "the value format is invalid".into(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn check(expr: &str, value: SettingValue) -> bool {
		RuleSet::parse(expr).unwrap().check(&value).is_ok()
	}

	#[test]
	fn test_integer_min() {
		assert!(check("integer|min:0", SettingValue::Int(0)));
		assert!(!check("integer|min:0", SettingValue::Int(-5)));
		assert!(check("integer|min:0", SettingValue::String("12".into())));
		assert!(!check("integer|min:0", SettingValue::String("abc".into())));
	}

	#[test]
	fn test_string_max_counts_characters() {
		assert!(check("required|string|max:3", SettingValue::String("añb".into())));
		assert!(!check("required|string|max:3", SettingValue::String("abcd".into())));
		assert!(!check("required|string|max:3", SettingValue::String("  ".into())));
	}

	#[test]
	fn test_nullable() {
		assert!(check("nullable|email|max:255", SettingValue::Null));
		assert!(!check("email", SettingValue::Null));
		assert!(!check("required|string", SettingValue::Null));
		assert!(check("", SettingValue::Null));
	}

	#[test]
	fn test_in_list() {
		assert!(check("in:en,es,fr", SettingValue::String("es".into())));
		assert!(!check("in:en,es,fr", SettingValue::String("it".into())));
		assert!(check("in:1,2", SettingValue::Int(2)));
	}

	#[test]
	fn test_boolean_and_array() {
		assert!(check("nullable|boolean", SettingValue::Bool(false)));
		assert!(check("nullable|boolean", SettingValue::Int(1)));
		assert!(!check("nullable|boolean", SettingValue::String("maybe".into())));
		assert!(check("nullable|array", SettingValue::Json(json!([{"date": "01/01/2024"}]))));
		assert!(!check("nullable|array", SettingValue::String("Monthly".into())));
	}

	#[test]
	fn test_decimal_places() {
		assert!(check("nullable|decimal:2|min:0", SettingValue::Float(10.25)));
		assert!(check("nullable|decimal:2|min:0", SettingValue::Int(10)));
		assert!(!check("nullable|decimal:2|min:0", SettingValue::Float(10.125)));
		assert!(!check("nullable|decimal:2|min:0", SettingValue::Float(-1.0)));
	}

	#[test]
	fn test_email_timezone_regex() {
		assert!(check("email", SettingValue::String("ops@example.com".into())));
		assert!(!check("email", SettingValue::String("not-an-email".into())));
		assert!(check("timezone", SettingValue::String("America/La_Paz".into())));
		assert!(check("timezone", SettingValue::String("UTC".into())));
		assert!(!check("timezone", SettingValue::String("Mars Base".into())));
		assert!(check("regex:/^#[0-9a-f]{6}$/i", SettingValue::String("#6366F1".into())));
		assert!(!check("regex:/^#[0-9a-f]{6}$/i", SettingValue::String("red".into())));
	}

	#[test]
	fn test_regex_alternation_keeps_its_pipes() {
		let expr = "required|string|regex:/^(monthly|weekly)$/";
		assert!(check(expr, SettingValue::String("weekly".into())));
		assert!(!check(expr, SettingValue::String("daily".into())));
		assert!(!check(expr, SettingValue::String(String::new())));
		assert!(check("regex:^(a|b)$", SettingValue::String("b".into())));
	}

	#[test]
	fn test_unknown_rule_fails_to_parse() {
		assert!(matches!(RuleSet::parse("string,max:1"), Err(Error::ConfigError(_))));
		assert!(matches!(RuleSet::parse("min:abc"), Err(Error::ConfigError(_))));
	}
}

// vim: ts=4
