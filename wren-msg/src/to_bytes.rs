use std_alloc::vec::Vec;

use crate::msg::*;

/// Trait allowing fallible conversion into bytes
pub trait TryIntoBytes {
  /// Error type yielded if conversion fails
  type Error;

  /// Try to write this value into `dest`, yielding the number of bytes written.
  ///
  /// ```
  /// use wren_msg::{code, Id, Message, TryIntoBytes, Type};
  ///
  /// let mut msg = Message::new(Type::Con, code::GET, Id(1));
  /// msg.set_uri_path("hello").unwrap();
  ///
  /// let mut buf = [0u8; 64];
  /// let len = msg.try_into_bytes(&mut buf).unwrap();
  /// assert_eq!(len, msg.get_size());
  /// ```
  fn try_into_bytes(&self, dest: &mut [u8]) -> Result<usize, Self::Error>;

  /// Serialize into a freshly allocated buffer of exactly the right size
  fn to_vec(&self) -> Result<Vec<u8>, Self::Error>;
}

/// Errors encounterable serializing to bytes
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, PartialOrd, Eq, Ord)]
pub enum MessageToBytesError {
  /// Reserved capacity was not enough for size of message
  #[error("buffer of {capacity} bytes cannot hold {size} bytes")]
  BufferTooSmall {
    /// Capacity of the buffer
    capacity: usize,
    /// Bytes needed
    size: usize,
  },

  /// An option delta or value length exceeded what the option header can express
  #[error("option length or delta {0} larger than 65804")]
  OptionTooLarge(u32),

  /// Options must be written in ascending number order
  #[error("option {number} written after option {prev}")]
  OptionsOutOfOrder {
    /// The option written before
    prev: OptNumber,
    /// The option being written
    number: OptNumber,
  },

  /// Class 6 codes only report local failures and never go on the wire
  #[error("local code {0} may not be serialized")]
  LocalCode(Code),

  /// Class must fit in 3 bits and detail in 5
  #[error("code {0:?} does not fit in one byte")]
  InvalidCode(Code),
}

impl<'a> TryIntoBytes for Message<'a> {
  type Error = MessageToBytesError;

  fn try_into_bytes(&self, dest: &mut [u8]) -> Result<usize, Self::Error> {
    if self.code.class > 0b111 || self.code.detail > 0b1_1111 {
      return Err(MessageToBytesError::InvalidCode(self.code));
    }

    if self.code.is_local() {
      return Err(MessageToBytesError::LocalCode(self.code));
    }

    let size = self.get_size();
    if dest.len() < size {
      return Err(MessageToBytesError::BufferTooSmall { capacity: dest.len(),
                                                       size });
    }

    let byte1: u8 = Byte1 { tkl: self.token.len() as u8,
                            ver: self.ver,
                            ty: self.ty }.into();
    let code: u8 = self.code.into();
    let id: [u8; 2] = self.id.into();

    dest[0] = byte1;
    dest[1] = code;
    dest[2..4].copy_from_slice(&id);

    let mut at = 4;
    dest[at..at + self.token.len()].copy_from_slice(self.token.as_bytes());
    at += self.token.len();

    let mut prev = OptNumber(0);
    for opt in self.options_present().iter() {
      let number = opt.number();
      let dest = &mut dest[at..];

      let written = match opt {
        | KnownOpt::IfMatch => serialize_bytes(number, prev, dest, &self.if_match, None),
        | KnownOpt::UriHost => serialize_bytes(number, prev, dest, self.uri_host.as_bytes(), None),
        | KnownOpt::ETag => serialize_bytes(number, prev, dest, &self.etag, None),
        | KnownOpt::IfNoneMatch => serialize_bytes(number, prev, dest, &[], None),
        | KnownOpt::Observe => serialize_int(number, prev, dest, self.observe),
        | KnownOpt::UriPort => serialize_int(number, prev, dest, self.uri_port.into()),
        | KnownOpt::LocationPath => serialize_multi(number, prev, dest, &self.location_path),
        | KnownOpt::UriPath => serialize_multi(number, prev, dest, &self.uri_path),
        | KnownOpt::ContentType => serialize_int(number, prev, dest, self.content_type.into()),
        | KnownOpt::MaxAge => serialize_int(number, prev, dest, self.max_age),
        | KnownOpt::UriQuery => serialize_multi(number, prev, dest, &self.uri_query),
        | KnownOpt::Accept => self.accept.iter().try_fold(0, |written, ct| {
                                                  let prev = if written == 0 { prev } else { number };
                                                  serialize_int(number,
                                                                prev,
                                                                &mut dest[written..],
                                                                (*ct).into()).map(|n| written + n)
                                                }),
        | KnownOpt::LocationQuery => serialize_multi(number, prev, dest, &self.location_query),
        | KnownOpt::Block2 => serialize_int(number, prev, dest, self.block2.into()),
        | KnownOpt::Block1 => serialize_int(number, prev, dest, self.block1.into()),
        | KnownOpt::Size => serialize_int(number, prev, dest, self.size),
        | KnownOpt::ProxyUri => serialize_bytes(number, prev, dest, self.proxy_uri.as_bytes(), None),
      }?;

      at += written;
      prev = number;
    }

    if let Some(payload) = self.payload() {
      dest[at] = 0b11111111;
      at += 1;
      dest[at..at + payload.len()].copy_from_slice(payload);
      at += payload.len();
    }

    debug_assert_eq!(at, size);
    Ok(at)
  }

  fn to_vec(&self) -> Result<Vec<u8>, Self::Error> {
    let mut bytes = std_alloc::vec![0u8; self.get_size()];
    let n = self.try_into_bytes(&mut bytes)?;
    bytes.truncate(n);
    Ok(bytes)
  }
}
