pub use strata_types::prelude::*;

pub use crate::settings::levels::ScopeContext;

// vim: ts=4
