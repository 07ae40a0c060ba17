pub mod auth_service;
pub mod color_scheme;
