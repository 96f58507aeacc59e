//! Low-level representation of CoAP messages, as spoken by constrained devices.
//!
//! The most notable item in `wren_msg` is [`Message`]; a CoAP message whose
//! options live in typed slots (one per known option number) instead of a
//! generic list, with a small bitset recording which of them are present.
//!
//! ## Zero-copy
//! Parsing a datagram never copies option values or the payload; string &
//! opaque options are [`Segment`]s borrowing the input buffer. When a parsed
//! message must outlive its buffer, [`Message::into_owned`] deep-copies every
//! borrowed view.
//!
//! ```
//! use wren_msg::{Id, Message, TryFromBytes, TryIntoBytes, Type};
//!
//! let mut req = Message::new(Type::Con, wren_msg::code::GET, Id(1));
//! req.set_uri_path("sensors/temp").unwrap();
//! req.set_max_age(30);
//!
//! let mut buf = [0u8; wren_msg::consts::MAX_PACKET_SIZE];
//! let len = req.try_into_bytes(&mut buf).unwrap();
//!
//! let parsed = Message::try_from_bytes(&buf[..len]).unwrap();
//! assert_eq!(parsed, req);
//! assert_eq!(parsed.uri_path().join(b'/'), b"sensors/temp".to_vec());
//! ```
//!
//! ## Option numbers
//! This crate speaks the draft-13 option registry (Content-Type is 12, Token is
//! carried in the header, Accept is repeatable). See [`KnownOpt`].

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(not(test), forbid(missing_debug_implementations, unreachable_pub))]
#![cfg_attr(not(test), deny(unsafe_code))]
#![cfg_attr(any(docsrs, feature = "docs"), feature(doc_cfg))]
#![deny(missing_docs)]

extern crate alloc as std_alloc;

/// Sizing constants
pub mod consts;

pub(crate) mod cursor;

#[doc(hidden)]
pub mod from_bytes;

/// Message structs
pub mod msg;

#[doc(hidden)]
pub mod to_bytes;

/// Splitting `coap://` URIs into their parts
pub mod uri;

#[doc(inline)]
pub use from_bytes::TryFromBytes;
#[doc(inline)]
pub use msg::*;
#[doc(inline)]
pub use to_bytes::{MessageToBytesError, TryIntoBytes};

#[cfg(test)]
pub(crate) fn test_msg() -> (Message<'static>, std_alloc::vec::Vec<u8>) {
  //                                version  token len  code (2.05 Content)
  //                                |        |          /
  //                                |  type  |         /  message ID
  //                                |  |     |        |   |
  //                                vv vv vvvv vvvvvvvv vvvvvvvvvvvvvvvv
  let header: [u8; 4] = 0b_01_00_0001_01000101_0000000000000001u32.to_be_bytes();
  let token: [u8; 1] = [254u8];
  // Content-Type (delta 12, len 1) = 50 (json)
  let options: [u8; 2] = [0b_1100_0001, 50];
  let payload: [&[u8]; 2] = [&[0b1111_1111_u8], b"hello, world!"];
  let bytes = [header.as_ref(),
               token.as_ref(),
               options.as_ref(),
               payload.concat().as_ref()].concat();

  let mut msg = Message::new(Type::Con, Code::new(2, 5), Id(1));
  msg.token = Token(tinyvec::array_vec!([u8; 8] => 254));
  msg.set_content_type(50);
  msg.set_payload(b"hello, world!".as_ref());

  (msg, bytes)
}

#[cfg(test)]
pub(crate) mod tests {
  #[macro_export]
  #[doc(hidden)]
  macro_rules! assert_eqb {
    ($actual:expr, $expected:expr) => {
      if $actual != $expected {
        panic!("expected {:08b} to equal {:08b}", $actual, $expected)
      }
    };
  }

  #[macro_export]
  #[doc(hidden)]
  macro_rules! assert_eqb_iter {
    ($actual:expr, $expected:expr) => {
      if $actual.iter().ne($expected.iter()) {
        panic!("expected {:?} to equal {:?}",
               $actual.into_iter()
                      .map(|b| format!("{:08b}", b))
                      .collect::<Vec<_>>(),
               $expected.into_iter()
                        .map(|b| format!("{:08b}", b))
                        .collect::<Vec<_>>())
      }
    };
  }
}
