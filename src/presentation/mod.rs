// Presentation layer - Chart view model and HTTP surface
pub mod app_state;
pub mod chart;
pub mod handlers;
