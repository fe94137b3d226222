pub mod app;
pub mod error;
pub mod fallback;
pub mod models;
pub mod providers;
pub mod rating;
pub mod session;
pub mod tmdb;
pub mod view;
