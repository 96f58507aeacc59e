use tinyvec::ArrayVec;

use crate::consts::TOKEN_LEN;

/// Message token, 0 to 8 opaque bytes.
///
/// The [`Id`](crate::Id) of a message matches an ACK to the datagram it acknowledges,
/// while the token matches a response to its request regardless of which
/// datagram carried it. A server may ACK a request immediately and send the
/// actual response later in a separate Confirmable message with a new id,
/// and the client relies on the token to correlate the two.
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct Token(pub ArrayVec<[u8; TOKEN_LEN]>);

impl Token {
  /// Take an arbitrary-length sequence of bytes and turn it into an opaque message token
  ///
  /// Currently uses the BLAKE2 hashing algorithm, but this may change in the future.
  ///
  /// ```
  /// use wren_msg::Token;
  ///
  /// let my_token = Token::opaque(&[0, 1, 2]);
  /// assert_eq!(my_token.len(), 8);
  /// ```
  pub fn opaque(data: &[u8]) -> Token {
    use blake2::digest::consts::U8;
    use blake2::{Blake2b, Digest};

    let mut digest = Blake2b::<U8>::new();
    digest.update(data);
    Token(Into::<[u8; 8]>::into(digest.finalize()).into())
  }

  /// Copy a token out of a slice of at most 8 bytes
  pub fn try_from_slice(bytes: &[u8]) -> Option<Token> {
    ArrayVec::try_from(bytes).ok().map(Token)
  }

  /// Number of bytes in the token (`0..=8`)
  pub fn len(&self) -> usize {
    self.0.len()
  }

  /// Is this the zero-length token?
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// The token bytes
  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn opaque_is_deterministic() {
    assert_eq!(Token::opaque(b"abc"), Token::opaque(b"abc"));
    assert_ne!(Token::opaque(b"abc"), Token::opaque(b"abd"));
  }

  #[test]
  fn from_slice() {
    assert_eq!(Token::try_from_slice(&[1, 2]).map(|t| t.len()), Some(2));
    assert_eq!(Token::try_from_slice(&[0; 9]), None);
  }
}
