//! The auth gateway contract for Messgate.
//!
//! Messgate doesn't verify passwords or mint tokens itself. That's the
//! backend's job. This crate describes what the client expects from it:
//!
//! - **Contract** ([`AuthGateway`]): login and refresh, both async
//! - **Wire types** ([`LoginGrant`], [`GatewayUser`], [`TokenPair`]):
//!   the response bodies, camelCase on the wire
//! - **Errors** ([`GatewayError`]): transport failure vs. rejection
//! - **Decoding** ([`decode_login`], [`decode_refresh`]): JSON bodies to
//!   wire types, behind the `json` feature
//! - **[`MemoryGateway`]**: an in-process backend for development, demos,
//!   and tests
//!
//! # The typed boundary
//!
//! The gateway speaks in raw strings (`"role": "admin"`). The session layer
//! speaks in closed enums. [`LoginGrant::into_event`] is where one becomes
//! the other, and where a role outside the known set gets turned away
//! before it can reach the session store.

#![allow(async_fn_in_trait)]

#[cfg(feature = "json")]
mod codec;
mod contract;
mod error;
mod memory;

#[cfg(feature = "json")]
pub use codec::{decode_login, decode_refresh};
pub use contract::{AuthGateway, GatewayUser, LoginGrant, TokenPair};
pub use error::GatewayError;
pub use memory::MemoryGateway;
