pub mod config;
pub mod constants;
pub mod extractors;
pub mod validator;
