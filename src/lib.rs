//! CMS version fingerprinting
//!
//! Probes a web server for well-known static assets, hashes what comes back and
//! narrows the set of CMS versions consistent with every observed hash.

pub mod cms;
pub mod config;
pub mod fingerprint;
pub mod logging;
pub mod scan;
