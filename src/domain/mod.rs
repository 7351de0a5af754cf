// Domain layer - chart view model types
pub mod series;
pub mod telemetry;
pub mod time_window;
