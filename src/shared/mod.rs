pub mod constants;
pub mod status;
pub mod templates;
#[cfg(test)]
pub mod test_helpers;
pub mod text;
pub mod types;
