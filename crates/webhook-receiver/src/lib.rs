//! # Webhook receiver
//!
//! HTTP endpoint that accepts webhook deliveries from the indexing provider and stores every
//! JSON payload verbatim. Exposes `/healthz` and `/readyz` probes backed by the sink's health.

mod config;
pub use config::Config;
mod server;
pub use server::Server;
mod sink;
pub use sink::{PayloadSink, PostgresSink, SinkError};
