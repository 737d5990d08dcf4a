//! Transport implementations for talking to scan targets

pub mod http;

pub use http::ReqwestTransport;
