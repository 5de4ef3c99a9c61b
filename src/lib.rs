pub mod error;
pub mod fetch;
pub mod grid;
pub mod infra;
pub mod render;
pub mod services;
pub mod view;
