pub mod loader;
pub mod models;

pub use loader::AppByIdLoader;
pub use models::App;
