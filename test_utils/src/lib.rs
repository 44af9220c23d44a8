#[macro_use]
pub mod serialization;
