// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_chart_source;
pub mod influx_repository;
