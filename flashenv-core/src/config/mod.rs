//! Configuration definitions
//!
//! Keys, field capacities, defaults, the in-memory values and the default
//! file template.

pub mod defaults;
pub mod keys;
pub mod template;
pub mod values;

pub use defaults::*;
pub use keys::{ConfigKey, KeySet};
pub use template::{DefaultTemplate, TEMPLATE_LINES};
pub use values::ConfigValues;
