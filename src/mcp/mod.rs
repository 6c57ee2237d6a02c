pub mod catalog;
pub mod protocol;
pub mod resources;
pub mod server;
