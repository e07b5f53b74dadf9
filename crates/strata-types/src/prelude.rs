pub use crate::error::{ClResult, Error};
pub use crate::level::SettingLevel;
pub use crate::types::{EntityId, Timestamp};
pub use crate::value::{SettingType, SettingValue};

pub use tracing::{debug, debug_span, error, info, info_span, warn};

// vim: ts=4
