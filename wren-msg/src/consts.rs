/// UDP port CoAP servers listen on by default
pub const DEFAULT_PORT: u16 = 5683;

/// UDP port for `coaps://` (DTLS) by default
pub const DEFAULT_SECURE_PORT: u16 = 5684;

/// Protocol version this crate reads & writes
pub const VERSION: u8 = 1;

/// Maximum token length, in bytes
pub const TOKEN_LEN: usize = 8;

/// Maximum ETag / If-Match length, in bytes
pub const ETAG_LEN: usize = 8;

/// Maximum number of Accept values a [`Message`](crate::Message) holds
pub const MAX_ACCEPT: usize = 2;

/// Max-Age assumed by a receiver when the option is absent, in seconds
pub const DEFAULT_MAX_AGE: u32 = 60;

/// Largest payload (or block) that we will put in a single datagram
pub const MAX_CHUNK_SIZE: usize = 128;

/// Conservative bound on the bytes preceding the payload.
///
/// Not every option is set at once, so this covers the options a constrained
/// client realistically sends together:
///
/// ```text
/// header  content-type  max-age  etag     observe  token    block  strings
/// 4     + 3           + 5      + 1 + 8  + 3      + 1 + 8  + 4    + 30
/// ```
pub const MAX_HEADER_SIZE: usize = 4 + 3 + 5 + (1 + ETAG_LEN) + 3 + (1 + TOKEN_LEN) + 4 + 30;

/// Largest message we build: header overhead, payload marker excluded, plus one chunk
pub const MAX_PACKET_SIZE: usize = MAX_HEADER_SIZE + MAX_CHUNK_SIZE;

/// Link MTU of the datagram transport
pub const LINK_MTU: usize = 1280;

/// Size of the IPv6 + UDP headers (28 for IPv4)
pub const IP_UDP_HEADER_LEN: usize = 48;

/// Usable bytes in one datagram
pub const MAX_DATAGRAM_SIZE: usize = LINK_MTU - IP_UDP_HEADER_LEN;

const _: () = assert!(MAX_PACKET_SIZE <= MAX_DATAGRAM_SIZE,
                      "MAX_PACKET_SIZE must fit in one datagram");

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn packet_fits_in_datagram() {
    assert_eq!(MAX_HEADER_SIZE, 67);
    assert_eq!(MAX_PACKET_SIZE, 195);
    assert!(MAX_PACKET_SIZE <= MAX_DATAGRAM_SIZE);
  }
}
