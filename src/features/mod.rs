pub mod hazards;
pub mod status;
