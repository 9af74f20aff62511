pub mod quiz;
pub mod result;
