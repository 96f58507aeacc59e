//! `wren` sees CoAP (draft-13) requests through an unreliable datagram
//! transport on constrained devices.
//!
//! ## CoAP
//! CoAP is an application-level network protocol that copies the semantics of HTTP
//! to an environment conducive to **constrained** devices. (weak hardware, small battery capacity, etc.)
//!
//! CoAP customarily sits on top of UDP, which offers no guarantee that a datagram
//! arrives. Messages of type Confirmable (CON) are retransmitted with exponential
//! back-off until the peer acknowledges them (ACK) or rejects them (RST), or until
//! the sender gives up.
//!
//! ## This crate
//! - [`wren_msg`] (re-exported as [`msg`]) turns bytes into messages & back
//! - [`engine::Engine`] owns outbound transactions, matches ACK/RST responses
//!   to them, and decides when to retransmit or abandon them
//! - [`req::ReqBuilder`] builds requests from `coap://` URIs
//!
//! The engine is runtime-agnostic and never reads a clock or
//! sleeps. The time is passed in, and the transport is anything implementing
//! [`net::Socket`] (implemented for `std::net::UdpSocket` with feature `std`).
//!
//! ```
//! use embedded_time::Clock as _;
//! use wren::config::Config;
//! use wren::engine::{Engine, Ignore};
//! use wren::req::ReqBuilder;
//!
//! # let server = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
//! # let mut uri = format!("coap://{}/hello", server.local_addr().unwrap());
//! let sock = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
//! sock.set_nonblocking(true).unwrap();
//!
//! let clock = wren::std::Clock::new();
//! let mut engine = Engine::<_, (), Ignore>::new(Config::default());
//!
//! let uri = wren::msg::uri::split(&mut uri).unwrap();
//! let peer = wren::std::net::to_no_std(server.local_addr().unwrap());
//!
//! let id = engine.next_id().unwrap();
//! let token = engine.next_token(id, clock.try_now().unwrap());
//! let req = ReqBuilder::get(&uri).build(id, token).unwrap();
//!
//! engine.create(id, peer, (), Ignore)
//!       .unwrap()
//!       .set_message(&req)
//!       .unwrap();
//! nb::block!(engine.send(id, clock.try_now().unwrap(), &sock)).unwrap();
//!
//! // nothing has arrived yet
//! let mut buf = [0u8; 1152];
//! assert!(matches!(engine.poll(&sock, &mut buf), Err(nb::Error::WouldBlock)));
//!
//! // nothing is due yet either
//! let (due, err) = engine.on_timer_tick(clock.try_now().unwrap(), &sock);
//! assert!(due.is_empty() && err.is_none());
//! ```

#![doc(html_root_url = "https://docs.rs/wren/0.3.0")]
#![cfg_attr(any(docsrs, feature = "docs"), feature(doc_cfg))]
// -
// style
#![allow(clippy::unused_unit)]
// -
// deny
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![cfg_attr(not(test), deny(unsafe_code))]
// -
// warnings
#![cfg_attr(not(test), warn(unreachable_pub))]
// -
// features
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc as std_alloc;

#[doc(inline)]
pub use wren_msg as msg;

#[cfg(test)]
pub(crate) mod test;

pub(crate) mod logging;

/// customizable retrying of fallible operations
pub mod retry;

/// transactions, retransmission & response matching
pub mod engine;

/// building requests
pub mod req;

/// network abstractions
pub mod net;

/// time abstractions
pub mod time;

/// configuring runtime behavior
pub mod config;

/// `std`-only wren stuff
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod std;
