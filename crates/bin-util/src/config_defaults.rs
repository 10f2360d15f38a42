//! # Default values
//!
//! Default values used in configs

use core::net::{IpAddr, Ipv4Addr, SocketAddr};

const RECEIVER_PORT: u16 = 5000;

/// Default address the webhook receiver listens on
#[must_use]
pub const fn default_bind_address() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), RECEIVER_PORT)
}

const MAX_DB_CONNECTIONS: u32 = 5;

/// Default size of the receiver's database pool
#[must_use]
pub const fn default_max_connections() -> u32 {
    MAX_DB_CONNECTIONS
}

const ASSETS_PAGE: u32 = 1;

/// Default page requested from the RPC
#[must_use]
pub const fn default_assets_page() -> u32 {
    ASSETS_PAGE
}

const ASSETS_LIMIT: u32 = 1000;

/// Default amount of assets requested per page
#[must_use]
pub const fn default_assets_limit() -> u32 {
    ASSETS_LIMIT
}
