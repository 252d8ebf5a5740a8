//! Data-driven content definitions and loaders.
//!
//! This crate houses the built-in shadow roster and provides loaders for
//! RON/TOML data files:
//! - Enemy templates (built-in registry, extendable via RON)
//! - Combat balance configuration (TOML)
//!
//! Content is consumed by the runtime through [`shadow_core::EnemyOracle`]
//! and never appears in session state except as freshly instantiated enemies.

pub mod registry;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use registry::{EnemyRegistry, builtin_templates};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, EnemyLoader, LoadResult};
