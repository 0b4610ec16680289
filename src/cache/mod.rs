//! Token cache: key derivation, the optional gateway and its backends.

pub mod gateway;
pub mod key;
pub mod memory;
pub mod redis;

pub use gateway::{TokenCacheGateway, TokenStore};
pub use memory::MemoryStore;
pub use self::redis::RedisStore;
