//! Error taxonomy shared by the engine and the storage adapters

use axum::{Json, http::StatusCode, response::IntoResponse};

use crate::level::SettingLevel;
use crate::value::SettingType;

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// Key is not present in the catalog
	UnknownSetting(String),
	/// Write targets a level the definition does not allow
	LevelNotAllowed { key: String, level: SettingLevel },
	/// Value rejected by the definition's validation rules
	ValidationError(String),
	/// Write to a non-system level without a target entity
	MissingEntityId(SettingLevel),
	/// Value cannot be coerced to the declared type
	TypeCast { typ: SettingType, message: String },
	/// Malformed catalog or runtime configuration
	ConfigError(String),
	DbError,

	// externals
	Io(std::io::Error),
}

impl Error {
	pub fn type_cast(typ: SettingType, message: impl Into<String>) -> Self {
		Error::TypeCast { typ, message: message.into() }
	}

	fn code(&self) -> &'static str {
		match self {
			Error::UnknownSetting(_) => "E-SETTING-UNKNOWN",
			Error::LevelNotAllowed { .. } => "E-SETTING-LEVEL",
			Error::ValidationError(_) => "E-VALIDATION",
			Error::MissingEntityId(_) => "E-SETTING-ENTITY",
			Error::TypeCast { .. } => "E-SETTING-TYPE",
			Error::ConfigError(_) => "E-CONFIG",
			Error::DbError => "E-DB",
			Error::Io(_) => "E-IO",
		}
	}

	fn status(&self) -> StatusCode {
		match self {
			Error::UnknownSetting(_) => StatusCode::NOT_FOUND,
			Error::LevelNotAllowed { .. }
			| Error::ValidationError(_)
			| Error::TypeCast { .. } => StatusCode::UNPROCESSABLE_ENTITY,
			Error::MissingEntityId(_) => StatusCode::BAD_REQUEST,
			Error::ConfigError(_) | Error::DbError | Error::Io(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::UnknownSetting(key) => write!(f, "unknown setting '{}'", key),
			Error::LevelNotAllowed { key, level } => {
				write!(f, "the '{}' setting is not available at the '{}' level", key, level)
			}
			Error::ValidationError(msg) => write!(f, "validation failed: {}", msg),
			Error::MissingEntityId(level) => {
				write!(f, "an entity id is required for {} settings", level)
			}
			Error::TypeCast { typ, message } => {
				write!(f, "cannot cast value to {}: {}", typ, message)
			}
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::DbError => write!(f, "storage error"),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		let status = self.status();
		// Internal failures are logged, not echoed to the client
		let message = if status.is_server_error() {
			tracing::warn!("request failed: {}", self);
			"Internal server error".to_string()
		} else {
			self.to_string()
		};
		let body = serde_json::json!({
			"error": {
				"code": self.code(),
				"message": message,
			}
		});
		(status, Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_display_names_the_setting() {
		let err = Error::LevelNotAllowed { key: "logo".into(), level: SettingLevel::User };
		assert_eq!(err.to_string(), "the 'logo' setting is not available at the 'user' level");
	}

	#[test]
	fn test_status_mapping() {
		assert_eq!(Error::UnknownSetting("x".into()).status(), StatusCode::NOT_FOUND);
		assert_eq!(Error::MissingEntityId(SettingLevel::User).status(), StatusCode::BAD_REQUEST);
		assert_eq!(
			Error::ValidationError("bad".into()).status(),
			StatusCode::UNPROCESSABLE_ENTITY
		);
		assert_eq!(Error::DbError.status(), StatusCode::INTERNAL_SERVER_ERROR);
	}
}

// vim: ts=4
