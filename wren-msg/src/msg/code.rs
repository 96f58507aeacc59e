use core::fmt;

/// Message Code: a method for requests, a status for responses.
///
/// Both share one 8-bit space on the wire, `class << 5 | detail`.
/// `0.00` is reserved for empty messages (pings, bare ACKs and RSTs).
///
/// # Examples
/// ```
/// use wren_msg::Code;
///
/// assert_eq!(Code { class: 2, detail: 5 }.to_string(), "2.05".to_string());
/// assert_eq!(u8::from(Code::new(4, 4)), 132);
/// ```
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct Code {
  /// The "class" of message codes identify it as a request or response, and provides the class of response status:
  ///
  /// |class|meaning|
  /// |---|---|
  /// |`0`|Message is a request|
  /// |`2`|Message is a success response|
  /// |`4`|Message is a client error response|
  /// |`5`|Message is a server error response|
  /// |`6`|Local-only pseudo-code, never sent|
  pub class: u8,

  /// 2-digit integer (range `[0, 32)`) that provides granular information about the response status.
  pub detail: u8,
}

/// Whether a code is empty, a request or a response
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum CodeKind {
  /// `0.00`
  Empty,
  /// `0.xx`
  Request,
  /// `2.xx`, `4.xx`, `5.xx`
  Response,
}

impl Code {
  /// Create a new Code
  ///
  /// ```
  /// use wren_msg::Code;
  ///
  /// let content = Code::new(2, 05);
  /// ```
  pub const fn new(class: u8, detail: u8) -> Self {
    Self { class, detail }
  }

  /// Get whether this code is for a request, response, or empty message
  pub fn kind(&self) -> CodeKind {
    match self.class {
      | 0 if self.detail == 0 => CodeKind::Empty,
      | 0 => CodeKind::Request,
      | _ => CodeKind::Response,
    }
  }

  /// Is this one of the pseudo-codes used to report local failures?
  ///
  /// These never go on the wire.
  pub fn is_local(&self) -> bool {
    self.class == 6
  }

  /// Get the human string representation of a message code
  ///
  /// ```
  /// use wren_msg::Code;
  ///
  /// let chars = Code::new(4, 15).to_human();
  /// assert_eq!(String::from_iter(chars), "4.15".to_string());
  /// ```
  pub fn to_human(&self) -> [char; 4] {
    let to_char = |d: u8| char::from_digit(d.into(), 10).unwrap_or('?');
    [to_char(self.class),
     '.',
     to_char(self.detail / 10),
     to_char(self.detail % 10)]
  }
}

impl fmt::Display for Code {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.to_human().iter().try_for_each(|c| write!(f, "{}", c))
  }
}

impl From<u8> for Code {
  fn from(b: u8) -> Self {
    let class = b >> 5;
    let detail = b & 0b0011111;

    Code { class, detail }
  }
}

impl From<Code> for u8 {
  fn from(code: Code) -> u8 {
    let class = code.class << 5;
    let detail = code.detail;

    class | detail
  }
}

macro_rules! code {
  ($(#[$meta:meta])* $name:ident = $c:literal . $d:literal) => {
    $(#[$meta])*
    #[allow(clippy::zero_prefixed_literal)]
    pub const $name: Code = Code::new($c, $d);
  };
}

code!(#[doc = "Empty message"] EMPTY = 0 . 00);

code!(#[doc = "GET method"] GET = 0 . 01);
code!(#[doc = "POST method"] POST = 0 . 02);
code!(#[doc = "PUT method"] PUT = 0 . 03);
code!(#[doc = "DELETE method"] DELETE = 0 . 04);

// 2.xx
code!(#[doc = "2.01 Created"] CREATED = 2 . 01);
code!(#[doc = "2.02 Deleted"] DELETED = 2 . 02);
code!(#[doc = "2.03 Valid"] VALID = 2 . 03);
code!(#[doc = "2.04 Changed"] CHANGED = 2 . 04);
code!(#[doc = "2.05 Content"] CONTENT = 2 . 05);

// 4.xx
code!(#[doc = "4.00 Bad Request"] BAD_REQUEST = 4 . 00);
code!(#[doc = "4.01 Unauthorized"] UNAUTHORIZED = 4 . 01);
code!(#[doc = "4.02 Bad Option"] BAD_OPTION = 4 . 02);
code!(#[doc = "4.03 Forbidden"] FORBIDDEN = 4 . 03);
code!(#[doc = "4.04 Not Found"] NOT_FOUND = 4 . 04);
code!(#[doc = "4.05 Method Not Allowed"] METHOD_NOT_ALLOWED = 4 . 05);
code!(#[doc = "4.06 Not Acceptable"] NOT_ACCEPTABLE = 4 . 06);
code!(#[doc = "4.12 Precondition Failed"] PRECONDITION_FAILED = 4 . 12);
code!(#[doc = "4.13 Request Entity Too Large"] REQUEST_ENTITY_TOO_LARGE = 4 . 13);
code!(#[doc = "4.15 Unsupported Media Type"] UNSUPPORTED_MEDIA_TYPE = 4 . 15);

// 5.xx
code!(#[doc = "5.00 Internal Server Error"] INTERNAL_SERVER_ERROR = 5 . 00);
code!(#[doc = "5.01 Not Implemented"] NOT_IMPLEMENTED = 5 . 01);
code!(#[doc = "5.02 Bad Gateway"] BAD_GATEWAY = 5 . 02);
code!(#[doc = "5.03 Service Unavailable"] SERVICE_UNAVAILABLE = 5 . 03);
code!(#[doc = "5.04 Gateway Timeout"] GATEWAY_TIMEOUT = 5 . 04);
code!(#[doc = "5.05 Proxying Not Supported"] PROXYING_NOT_SUPPORTED = 5 . 05);

// local
code!(
  /// Storage for a message or transaction could not be obtained.
  ///
  /// Local only; refused by the serializer.
  MEMORY_ALLOCATION_ERROR = 6 . 00
);
code!(
  /// A message could not be serialized.
  ///
  /// Local only; refused by the serializer.
  PACKET_SERIALIZATION_ERROR = 6 . 01
);

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_eqb;

  #[test]
  fn parse_code() {
    let byte = 0b_01_000101u8;
    let code = Code::from(byte);
    assert_eq!(code, Code { class: 2, detail: 5 })
  }

  #[test]
  fn serialize_code() {
    let code = Code { class: 2, detail: 5 };
    let actual: u8 = code.into();
    let expected = 0b_010_00101u8;
    assert_eqb!(actual, expected)
  }

  #[test]
  fn numeric_values() {
    assert_eq!(u8::from(GET), 1);
    assert_eq!(u8::from(DELETE), 4);
    assert_eq!(u8::from(CONTENT), 69);
    assert_eq!(u8::from(NOT_FOUND), 132);
    assert_eq!(u8::from(UNSUPPORTED_MEDIA_TYPE), 143);
    assert_eq!(u8::from(INTERNAL_SERVER_ERROR), 160);
    assert_eq!(u8::from(PROXYING_NOT_SUPPORTED), 165);
    assert_eq!(u8::from(MEMORY_ALLOCATION_ERROR), 192);
    assert_eq!(u8::from(PACKET_SERIALIZATION_ERROR), 193);
  }

  #[test]
  fn kind() {
    assert_eq!(EMPTY.kind(), CodeKind::Empty);
    assert_eq!(POST.kind(), CodeKind::Request);
    assert_eq!(BAD_OPTION.kind(), CodeKind::Response);
    assert!(PACKET_SERIALIZATION_ERROR.is_local());
    assert!(!CONTENT.is_local());
  }
}
