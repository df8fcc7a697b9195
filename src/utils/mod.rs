pub mod log;
pub mod path_validator;

pub use path_validator::PathValidator;
