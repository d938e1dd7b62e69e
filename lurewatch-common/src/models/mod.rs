pub mod campaign;
pub mod delivery;
pub mod target;
pub mod user_settings;
