pub mod categories;
pub mod envelope;
pub mod handlers;
pub mod middleware;
pub mod requests;
pub mod resources;
pub mod routes;
pub mod suggestions;

pub use routes::create_router;
