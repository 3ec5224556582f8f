//! Ingress gateway for dataset uploads.
//!
//! Accepts binary or JSON file uploads over HTTP, authenticates the caller
//! via a bearer credential, optionally validates JSON payloads against a
//! schema stored alongside the dataset, buckets ordinary uploads into
//! UTC time partitions, and forwards the bytes to a hierarchical object
//! store behind the [`store::ObjectStore`] trait.

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
