pub mod loader;
pub mod models;
pub mod names;
pub mod record;
