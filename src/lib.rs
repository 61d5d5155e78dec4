pub mod config;
pub mod fetch;
pub mod loader;
pub mod model;
pub mod output;
pub mod render;
pub mod scale;
pub mod session;
pub mod slider;
pub mod traffic;
