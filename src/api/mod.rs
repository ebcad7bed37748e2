pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use error::ApiError;
pub use handlers::{AppState, CountResponse};
pub use routes::{create_api_router, create_app};
