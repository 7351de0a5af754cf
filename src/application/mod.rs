// Application layer - Use cases and the ports they drive
pub mod chart_repository;
pub mod chart_service;
pub mod chart_source;
pub mod chart_view;
pub mod poller;
