pub mod tap_registry;

pub use tap_registry::TapRegistry;
