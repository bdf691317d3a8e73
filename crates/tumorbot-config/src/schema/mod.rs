//! Configuration schema types for tumorbot.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod logging;
mod provider;
mod references;
mod session;

pub use logging::*;
pub use provider::*;
pub use references::*;
pub use session::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TumorbotConfig {
    pub provider: ProviderConfig,
    pub references: ReferencesConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}
