//! Cache-aside acquisition of app and user tokens.

pub mod acquirer;
pub mod bypass;

pub use acquirer::TokenAcquirer;
pub use bypass::CacheBypass;
