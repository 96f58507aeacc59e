use super::opt::parse_error::OptParseError;
use crate::code::{self, Code};

/// Problems with the fixed 4-byte header or the token following it
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, PartialOrd, Eq, Ord)]
pub enum HeaderError {
  /// Datagram was shorter than the 4-byte header
  #[error("datagram of {0} bytes is shorter than the header")]
  TooShort(usize),

  /// Version bits were something other than `1`
  #[error("unsupported protocol version {0}")]
  UnsupportedVersion(u8),

  /// Token length was > 8
  #[error("token length {0} is greater than 8")]
  InvalidTokenLength(u8),

  /// Token length claimed more bytes than the datagram has
  #[error("datagram ended inside the token")]
  TruncatedToken,
}

/// Errors encounterable while parsing a message from bytes
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, PartialOrd, Eq, Ord)]
pub enum MessageParseError {
  /// The header or token could not be read
  #[error("malformed header: {0}")]
  MalformedHeader(#[from] HeaderError),

  /// An option could not be read, or must be understood and isn't
  #[error("bad option: {0}")]
  BadOption(#[from] OptParseError),

  /// The payload marker `0xFF` was the last byte of the datagram
  #[error("payload marker was not followed by a payload")]
  EmptyPayload,
}

impl MessageParseError {
  /// The response code a server should answer a datagram
  /// that failed to parse with this error.
  ///
  /// ```
  /// use wren_msg::{code, Message, MessageParseError, TryFromBytes};
  ///
  /// let err = Message::try_from_bytes(&[0x40, 0x01, 0x00]).unwrap_err();
  /// assert_eq!(err.status(), code::BAD_REQUEST);
  /// ```
  pub fn status(&self) -> Code {
    match self {
      | Self::BadOption(_) => code::BAD_OPTION,
      | Self::MalformedHeader(_) | Self::EmptyPayload => code::BAD_REQUEST,
    }
  }
}
