//! Setting levels (scopes) and their fixed priorities

use serde::{Deserialize, Serialize};

/// A scope at which a setting can be overridden.
///
/// Each level carries a priority number: SYSTEM=1, FACILITY=2, USER=3.
/// The number orders the levels; override precedence runs the other way,
/// a USER value shadows a FACILITY value which shadows a SYSTEM value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingLevel {
	/// Global application settings
	System,
	/// Per-facility overrides
	Facility,
	/// Per-user overrides
	User,
}

impl SettingLevel {
	/// All levels in ascending priority number
	pub const ALL: [SettingLevel; 3] =
		[SettingLevel::System, SettingLevel::Facility, SettingLevel::User];

	pub fn priority(self) -> u8 {
		match self {
			SettingLevel::System => 1,
			SettingLevel::Facility => 2,
			SettingLevel::User => 3,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			SettingLevel::System => "system",
			SettingLevel::Facility => "facility",
			SettingLevel::User => "user",
		}
	}

	/// Human-readable name
	pub fn name(self) -> &'static str {
		match self {
			SettingLevel::System => "System",
			SettingLevel::Facility => "Facility",
			SettingLevel::User => "User",
		}
	}

	pub fn description(self) -> &'static str {
		match self {
			SettingLevel::System => "Global system settings",
			SettingLevel::Facility => "Facility specific settings",
			SettingLevel::User => "User specific settings",
		}
	}
}

impl std::fmt::Display for SettingLevel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::str::FromStr for SettingLevel {
	type Err = crate::error::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"system" => Ok(SettingLevel::System),
			"facility" => Ok(SettingLevel::Facility),
			"user" => Ok(SettingLevel::User),
			other => Err(crate::error::Error::ValidationError(format!(
				"unknown setting level '{}'",
				other
			))),
		}
	}
}


// vim: ts=4
