pub mod schema;
pub mod models;
pub mod validation;
pub mod errors;

pub use schema::*;
pub use models::*;
pub use validation::*;
pub use errors::*;
