// Layer processing: pure table transforms between layers

pub mod gold;
pub mod silver;

pub use gold::{gold_transform, GoldOutput, GoldPolicy};
pub use silver::{silver_transform, SchemaMapping};
