//! Version fingerprinting layer
//!
//! This module provides the core functionality for hashing remote assets and
//! resolving which CMS versions are consistent with the observed hashes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Transport  │────▶│   Hasher    │────▶│  Resolver   │
//! │ (HTTP req)  │     │   (MD5)     │     │ (intersect) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       │
//!        ▼                                       ▼
//! ┌─────────────┐                         ┌─────────────┐
//! │  Changelog  │                         │   Corpus    │
//! │   (probe)   │                         │(file→hashes)│
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`transport`]: Transport trait and HTTP verbs
//! - [`transports`]: Concrete transports (reqwest)
//! - [`hasher`]: Hash provider trait and the MD5 implementation
//! - [`corpus`]: Reference corpus of (file, version, hash) triples
//! - [`resolver`]: Candidate set narrowing across probed files
//! - [`changelog`]: Changelog exposure probe
//! - [`ordering`]: Version string ordering
//! - [`error`]: Error types for probing and corpus loading
//! - [`types`]: Probe and resolution results

pub mod changelog;
pub mod corpus;
pub mod error;
pub mod hasher;
pub mod ordering;
pub mod resolver;
pub mod transport;
pub mod transports;
pub mod types;
