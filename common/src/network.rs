pub mod host;
pub mod interface;
pub mod ports;
pub mod services;
pub mod subnet;
