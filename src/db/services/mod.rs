//! Data access for every table of the site.
//!
//! One sub-module per entity. HTTP handlers call these functions instead of
//! building queries themselves; all of them return `DbErr` and leave the
//! mapping to HTTP status codes to the web layer. Functions that update or
//! delete by key return `Option`/`bool` so a missing row can become a 404.

pub mod blog_service;
pub mod callback_service;
pub mod contact_service;
pub mod customer_service;
pub mod loyalty_service;
pub mod portfolio_service;
pub mod section_service;
pub mod settings_service;
pub mod user_service;

pub use blog_service::*;
pub use callback_service::*;
pub use contact_service::*;
pub use customer_service::*;
pub use loyalty_service::*;
pub use portfolio_service::*;
pub use section_service::*;
pub use settings_service::*;
pub use user_service::*;
