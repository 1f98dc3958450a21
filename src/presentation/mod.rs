// Presentation layer - HTTP routes, handlers and page rendering
pub mod api_error;
pub mod app_state;
pub mod handlers;
pub mod page;
