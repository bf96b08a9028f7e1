mod hazard_handler;

pub use hazard_handler::*;
