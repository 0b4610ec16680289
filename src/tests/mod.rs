pub mod common;
pub mod http_issuer_flow;
