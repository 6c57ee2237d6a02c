pub mod credential;
pub mod gateway;
pub mod logger;
pub mod settings;
pub mod upstream;
pub mod validation;
