pub mod action_handlers;
pub mod auth_handlers;
pub mod dashboard;
pub mod home;
pub mod import_handlers;
