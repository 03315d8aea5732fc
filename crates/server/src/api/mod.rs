pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod run;

pub use routes::create_router;
