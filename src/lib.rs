pub mod api;
pub mod config;
pub mod feed;
pub mod models;
