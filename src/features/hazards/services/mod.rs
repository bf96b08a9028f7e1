mod card_renderer;
mod hazard_service;
mod hazard_store;

pub use card_renderer::render_report_list;
pub use hazard_service::{user_message, Flow, HazardService};
pub use hazard_store::{HazardStore, PgHazardStore};
