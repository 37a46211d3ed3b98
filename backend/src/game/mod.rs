pub mod core;
pub mod gateway;

pub use self::core::messages;
