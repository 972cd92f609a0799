mod category_api_client;
mod category_backend;

pub use category_api_client::CategoryApiClient;
pub use category_backend::CategoryBackend;
