//! SeaORM entities mapping the florist site tables.
//!
//! Every entity lives in its own module.

pub mod admin_user;
pub mod blog_post;
pub mod callback_request;
pub mod contact_info;
pub mod customer;
pub mod loyalty_program;
pub mod portfolio_item;
pub mod section;
pub mod site_setting;
