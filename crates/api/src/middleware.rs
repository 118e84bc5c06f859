/// Mapping of agenda errors to HTTP responses
pub mod error_handling;
