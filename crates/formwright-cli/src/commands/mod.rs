//! Command implementations.

pub mod fields;
pub mod fill;
pub mod models;

pub use self::fields::execute_fields;
pub use self::fill::execute_fill;
pub use self::models::execute_models;
