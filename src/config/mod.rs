pub mod device_config;

pub use device_config::*;
