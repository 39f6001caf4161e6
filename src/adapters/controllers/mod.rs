pub mod auth_controller;
pub mod file_controller;
pub mod health_controller;
pub mod user_controller;
