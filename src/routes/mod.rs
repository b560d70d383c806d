// Route module exports
pub mod dashboard_routes;
pub mod file_routes;
pub mod submission_routes;
pub mod team_routes;
