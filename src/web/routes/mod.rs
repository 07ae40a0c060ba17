pub mod blog_routes;
pub mod callback_routes;
pub mod chatbot_routes;
pub mod contact_routes;
pub mod customer_routes;
pub mod loyalty_routes;
pub mod portfolio_routes;
pub mod section_routes;
pub mod settings_routes;
