//! Built-in setting definitions
//!
//! Used when no catalog file is configured.

use serde_json::json;

use crate::prelude::*;
use crate::settings::{SettingDefinition, SettingsRegistry};

const SYSTEM_ONLY: [SettingLevel; 1] = [SettingLevel::System];
const SYSTEM_AND_USER: [SettingLevel; 2] = [SettingLevel::System, SettingLevel::User];
const ALL_LEVELS: [SettingLevel; 3] = SettingLevel::ALL;

/// Register all built-in settings
pub fn register_settings(registry: &mut SettingsRegistry) -> ClResult<()> {
	register_company(registry)?;
	register_login(registry)?;
	register_user(registry)?;
	register_notifications(registry)?;
	register_modules(registry)?;
	Ok(())
}

fn register_company(registry: &mut SettingsRegistry) -> ClResult<()> {
	const GROUP: [&str; 2] = ["Company", "Company settings"];

	for (key, name, default) in [
		("company-name", "Company name", "Company name"),
		("logo", "Logo", ""),
		("primary-color", "Primary color", "#6366f1"),
		("secondary-color", "Secondary color", "#0A0B17"),
	] {
		registry.register(
			SettingDefinition::builder(key)
				.name(name)
				.default(default)
				.levels(SYSTEM_ONLY)
				.validation("required|string|max:255")
				.group_path(GROUP)
				.build()?,
		)?;
	}

	for (key, name) in
		[("address-1", "Address 1"), ("address-2", "Address 2"), ("phone_number", "Phone number")]
	{
		registry.register(
			SettingDefinition::builder(key)
				.name(name)
				.levels(SYSTEM_ONLY)
				.validation("nullable|string|max:255")
				.group_path(GROUP)
				.build()?,
		)?;
	}

	registry.register(
		SettingDefinition::builder("email")
			.name("Email")
			.levels(SYSTEM_ONLY)
			.validation("nullable|email|max:255")
			.group_path(GROUP)
			.build()?,
	)?;

	Ok(())
}

fn register_login(registry: &mut SettingsRegistry) -> ClResult<()> {
	for (key, name) in [
		("enabled-captcha-security", "Enabled Captcha Security"),
		("forze-secure-password", "Forze secure password"),
	] {
		registry.register(
			SettingDefinition::builder(key)
				.name(name)
				.typ(SettingType::Boolean)
				.default(false)
				.levels(SYSTEM_ONLY)
				.validation("nullable|boolean")
				.group_path(["Login", "Login settings"])
				.build()?,
		)?;
	}
	Ok(())
}

fn register_user(registry: &mut SettingsRegistry) -> ClResult<()> {
	registry.register(
		SettingDefinition::builder("language")
			.name("Idioma")
			.description("Idioma de la aplicación")
			.default("en")
			.levels(ALL_LEVELS)
			.validation("in:en,es,fr,de,pt")
			.group_path(["User", "System"])
			.option("en", "English")
			.option("es", "Spanish")
			.resettable(true)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("timezone")
			.name("Time zone")
			.description("Zona horaria por defecto")
			.default("UTC")
			.levels(ALL_LEVELS)
			.validation("timezone")
			.group_path(["User", "System"])
			.option("UTC", "UTC")
			.option("America/La_Paz", "America/La_Paz")
			.option("US/Arizona", "US/Arizona")
			.build()?,
	)?;

	// Number format
	for (key, name, default) in [
		("thousands-separator", "Thousands separator", "."),
		("decimal-separator", "Decimal separator", ","),
	] {
		registry.register(
			SettingDefinition::builder(key)
				.name(name)
				.default(default)
				.levels(ALL_LEVELS)
				.validation("nullable|string|max:1")
				.group_path(["User", "Number format"])
				.build()?,
		)?;
	}

	registry.register(
		SettingDefinition::builder("number-of-decimals")
			.name("Number of decimals")
			.typ(SettingType::Integer)
			.default(2_i64)
			.levels(ALL_LEVELS)
			.validation("integer|min:0")
			.group_path(["User", "Number format"])
			.build()?,
	)?;

	let mut start_of_week = SettingDefinition::builder("start_of_week")
		.name("Start of the week")
		.default("monday")
		.levels(ALL_LEVELS)
		.validation("in:sunday,monday,tuesday,wednesday,thursday,friday,saturday")
		.group_path(["User", "Calendar"]);
	for (id, value) in [
		("sunday", "Sunday"),
		("monday", "Monday"),
		("tuesday", "Tuesday"),
		("wednesday", "Wednesday"),
		("thursday", "Thursday"),
		("friday", "Friday"),
		("saturday", "Saturday"),
	] {
		start_of_week = start_of_week.option(id, value);
	}
	registry.register(start_of_week.build()?)?;

	registry.register(
		SettingDefinition::builder("rows_per_page")
			.name("Rows per page")
			.typ(SettingType::Integer)
			.default(10_i64)
			.levels(ALL_LEVELS)
			.validation("integer|min:1")
			.group_path(["User", "Tables"])
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("sidebar_width")
			.name("Sidebar width")
			.typ(SettingType::Integer)
			.default(280_i64)
			.levels(ALL_LEVELS)
			.validation("integer|min:1")
			.group_path(["User", "Layout"])
			.build()?,
	)?;

	Ok(())
}

fn register_notifications(registry: &mut SettingsRegistry) -> ClResult<()> {
	for (key, name) in
		[("new-user-is-created", "New user is created"), ("new-item-is-created", "New item is created")]
	{
		registry.register(
			SettingDefinition::builder(key)
				.name(name)
				.typ(SettingType::Boolean)
				.default(false)
				.levels(SYSTEM_AND_USER)
				.validation("nullable|boolean")
				.group_path(["Notifications", "Notification settings"])
				.build()?,
		)?;
	}
	Ok(())
}

fn register_modules(registry: &mut SettingsRegistry) -> ClResult<()> {
	registry.register(
		SettingDefinition::builder("required-bill-of-materials")
			.name("Required bill of materials")
			.typ(SettingType::Boolean)
			.default(false)
			.levels(SYSTEM_ONLY)
			.validation("nullable|boolean")
			.group_path(["Module options", "Inventory"])
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("invoice-tax-percentage")
			.name("Invoice - Tax percentage")
			.typ(SettingType::Float)
			.default(10.0)
			.levels(SYSTEM_ONLY)
			.validation("nullable|numeric|min:0")
			.group_path(["Module options", "Inventory"])
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("discount-cost-percentage-secondary-item-output")
			.name("Discount cost percentage - secondary item outputs")
			.typ(SettingType::Float)
			.default(10.0)
			.levels(SYSTEM_ONLY)
			.validation("nullable|decimal:2|min:0")
			.group_path(["Module options", "Inventory"])
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("limit-to-approve-transactions")
			.name("Limit to approve transactions")
			.typ(SettingType::Float)
			.default(5000.0)
			.levels(SYSTEM_ONLY)
			.validation("nullable|decimal:2|min:0")
			.group_path(["Module options", "Supplies"])
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("enabled-google-maps")
			.name("Enabled google maps")
			.typ(SettingType::Boolean)
			.default(true)
			.levels(SYSTEM_ONLY)
			.validation("nullable|boolean")
			.group_path(["Module options", "Transfers"])
			.build()?,
	)?;

	// Labor tracker
	registry.register(
		SettingDefinition::builder("enabled-weekend-usage")
			.name("Enabled weekend usage")
			.typ(SettingType::Boolean)
			.default(true)
			.levels(SYSTEM_ONLY)
			.validation("nullable|boolean")
			.group_path(["Module options", "Labor tracker"])
			.build()?,
	)?;

	for (key, name) in [
		("labor-tracker-limit-of-previous-days", "Labor tracker - limit of previous days"),
		("labor-tracker-limit-of-next-days", "Labor tracker - limit of next days"),
	] {
		registry.register(
			SettingDefinition::builder(key)
				.name(name)
				.typ(SettingType::Integer)
				.default(2_i64)
				.levels(SYSTEM_ONLY)
				.validation("nullable|integer|min:0")
				.group_path(["Module options", "Labor tracker"])
				.build()?,
		)?;
	}

	registry.register(
		SettingDefinition::builder("holidays")
			.name("Holidays")
			.typ(SettingType::Json)
			.default(json!([
				{ "description": "New Year's Day", "day": "Monday, January 1", "date": "01/01/2024" },
				{ "description": "Martin Luther King, Jr. Day", "day": "Monday, January 15", "date": "01/15/2024" },
				{ "description": "Presidents' Day", "day": "Monday, February 19", "date": "02/19/2024" },
				{ "description": "Memorial Day", "day": "Monday, May 27", "date": "05/27/2024" },
				{ "description": "Juneteenth National Independence Day", "day": "Wednesday, June 19", "date": "06/19/2024" },
				{ "description": "Independence Day - U.S.", "day": "Thursday, July 4", "date": "07/04/2024" },
				{ "description": "Labor Day - U.S.", "day": "Monday, September 2", "date": "09/02/2024" },
				{ "description": "Columbus Day/Indigenous Peoples' Day", "day": "Monday, October 14", "date": "10/14/2024" },
				{ "description": "Thanksgiving Day", "day": "Thursday, November 28", "date": "11/28/2024" },
				{ "description": "Thanksgiving Day Break", "day": "Friday, November 29", "date": "11/29/2024" },
				{ "description": "Christmas Day", "day": "Wednesday, December 25", "date": "12/25/2024" },
			]))
			.levels(SYSTEM_ONLY)
			.validation("nullable|array")
			.group_path(["Module options", "Labor tracker"])
			.build()?,
	)?;

	let mut period = SettingDefinition::builder("period-reconciliation")
		.name("Period reconciliation")
		.default("monthly")
		.levels(SYSTEM_ONLY)
		.validation("nullable|in:monthly,every-other,quarterly,every-6-months,yearly")
		.group_path(["Cost center", "Period reconciliation"]);
	for (id, value) in [
		("monthly", "Monthly"),
		("every-other", "Every other"),
		("quarterly", "Quarterly"),
		("every-6-months", "Every 6 months"),
		("yearly", "Yearly"),
	] {
		period = period.option(id, value);
	}
	registry.register(period.build()?)?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_builtin_catalog_loads() {
		let mut registry = SettingsRegistry::new();
		register_settings(&mut registry).unwrap();
		let registry = registry.freeze();
		assert_eq!(registry.len(), 30);

		let language = registry.get("language").unwrap();
		assert!(language.resettable);
		assert_eq!(language.levels, ALL_LEVELS.to_vec());

		let tax = registry.get("invoice-tax-percentage").unwrap();
		assert_eq!(tax.default, SettingValue::Float(10.0));

		let holidays = registry.get("holidays").unwrap();
		assert_eq!(holidays.default.to_json().as_array().map(Vec::len), Some(11));
	}

	#[test]
	fn test_builtin_rules_apply() {
		let mut registry = SettingsRegistry::new();
		register_settings(&mut registry).unwrap();
		let registry = registry.freeze();

		let decimals = registry.get("number-of-decimals").unwrap();
		assert!(decimals.validate(&SettingValue::Int(-5)).is_err());
		assert!(decimals.validate(&SettingValue::Int(3)).is_ok());

		let separator = registry.get("thousands-separator").unwrap();
		assert!(separator.validate(&SettingValue::String(",".into())).is_ok());
		assert!(separator.validate(&SettingValue::String(",,".into())).is_err());
		assert!(separator.validate(&SettingValue::Null).is_ok());
	}
}

// vim: ts=4
