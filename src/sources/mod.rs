//! Token issuer side: what is requested and who is asked.

pub mod issuer;
pub mod request;

pub use issuer::{HttpIssuer, IssuerRejection, TokenIssuer, ISSUER_SUCCESS_CODE};
pub use request::{TokenKind, TokenRequest};
