pub mod models;
pub mod show;
