pub mod compliance;
pub mod engine;
