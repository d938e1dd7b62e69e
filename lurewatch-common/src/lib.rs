pub mod db;
pub mod email;
pub mod events;
pub mod html;
pub mod messages;
pub mod models;
pub mod schema;
pub mod templates;
pub mod threadrand;
pub mod validators;
