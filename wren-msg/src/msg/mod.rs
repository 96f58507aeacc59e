use tinyvec::ArrayVec;

use crate::consts::{ETAG_LEN, MAX_ACCEPT, VERSION};
use crate::cursor::Cursor;
use crate::TryFromBytes;

/// Message Code
pub mod code;

/// Message parsing errors
pub mod parse_error;

/// Message ID
pub mod id;

/// Message Options
pub mod opt;

/// Typed option accessors
pub mod options;

/// Message Type
pub mod ty;

/// Message Token
pub mod token;

/// Message Version
pub mod ver;

pub use code::{Code, CodeKind};
pub use id::*;
pub use opt::*;
pub use options::*;
pub use parse_error::*;
pub use token::*;
pub use ty::*;
pub use ver::*;

/// Struct representing the first byte of a message.
///
/// ```text
/// CoAP version
/// |
/// |  Message type (request, response, empty)
/// |  |
/// |  |  Length of token, in bytes. (4-bit integer)
/// |  |  |
/// vv vv vvvv
/// 01 00 0000
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub(crate) struct Byte1 {
  pub(crate) ver: Version,
  pub(crate) ty: Type,
  pub(crate) tkl: u8,
}

impl From<u8> for Byte1 {
  fn from(b: u8) -> Self {
    let ver = b >> 6; // bits 0 & 1
    let ty = b >> 4 & 0b11; // bits 2 & 3
    let tkl = b & 0b1111u8; // last 4 bits

    Byte1 { ver: Version(ver),
            ty: Type::from_bits(ty),
            tkl }
  }
}

impl From<Byte1> for u8 {
  fn from(b: Byte1) -> u8 {
    let ver = b.ver.0 << 6;
    let ty = u8::from(b.ty) << 4;
    let tkl = b.tkl;

    ver | ty | tkl
  }
}

/// # `Message` struct
/// A CoAP message; the fixed header, a token, one typed slot per known option, and a payload.
///
/// Options are set & read through typed accessors (see the [`options`] module), which keep
/// a bitset of present options in sync. Serialization always emits options in ascending
/// option number order, regardless of the order they were set in.
///
/// `'a` is the lifetime of the memory string, opaque & payload values borrow from; either
/// the datagram the message was parsed from or arguments given to setters.
///
/// ```
/// use wren_msg::*;
/// # //                       version  token len  code (2.05 Content)
/// # //                       |        |          /
/// # //                       |  type  |         /  message ID
/// # //                       |  |     |        |   |
/// # //                       vv vv vvvv vvvvvvvv vvvvvvvvvvvvvvvv
/// # let header: [u8; 4] = 0b_01_00_0001_01000101_0000000000000001u32.to_be_bytes();
/// # let token: [u8; 1] = [254u8];
/// # let options: [u8; 2] = [0b_1100_0001, 50];
/// # let payload: [&[u8]; 2] = [&[0b_11111111u8], b"hello, world!"];
/// let packet: Vec<u8> = /* bytes! */
/// # [header.as_ref(), token.as_ref(), options.as_ref(), payload.concat().as_ref()].concat();
///
/// let msg = Message::try_from_bytes(&packet).unwrap();
///
/// assert_eq!(msg.id, Id(1));
/// assert_eq!(msg.ty, Type::Con);
/// assert_eq!(msg.code, code::CONTENT);
/// assert_eq!(msg.token, Token(tinyvec::array_vec!([u8; 8] => 254)));
/// assert_eq!(msg.content_type(), Some(50));
/// assert_eq!(msg.payload(), Some(b"hello, world!".as_ref()));
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message<'a> {
  /// see [`Id`] for details
  pub id: Id,
  /// see [`Type`] for details
  pub ty: Type,
  /// see [`Version`] for details
  pub ver: Version,
  /// see [`Token`] for details
  pub token: Token,
  /// see [`Code`] for details
  pub code: Code,

  pub(crate) present: OptionSet,
  pub(crate) if_match: ArrayVec<[u8; ETAG_LEN]>,
  pub(crate) uri_host: Segment<'a>,
  pub(crate) etag: ArrayVec<[u8; ETAG_LEN]>,
  pub(crate) observe: u32,
  pub(crate) uri_port: u16,
  pub(crate) location_path: Segments<'a>,
  pub(crate) uri_path: Segments<'a>,
  pub(crate) content_type: u16,
  pub(crate) max_age: u32,
  pub(crate) uri_query: Segments<'a>,
  pub(crate) accept: ArrayVec<[u16; MAX_ACCEPT]>,
  pub(crate) location_query: Segments<'a>,
  pub(crate) block2: Block,
  pub(crate) block1: Block,
  pub(crate) size: u32,
  pub(crate) proxy_uri: Segment<'a>,

  pub(crate) payload: Option<Segment<'a>>,
}

impl<'a> Message<'a> {
  /// Create a message with no token, options or payload
  pub fn new(ty: Type, code: Code, id: Id) -> Self {
    Message { id,
              ty,
              ver: Version::default(),
              token: Token::default(),
              code,
              present: OptionSet::new(),
              if_match: ArrayVec::new(),
              uri_host: Segment::default(),
              etag: ArrayVec::new(),
              observe: 0,
              uri_port: 0,
              location_path: Segments::new(),
              uri_path: Segments::new(),
              content_type: 0,
              max_age: 0,
              uri_query: Segments::new(),
              accept: ArrayVec::new(),
              location_query: Segments::new(),
              block2: Block::default(),
              block1: Block::default(),
              size: 0,
              proxy_uri: Segment::default(),
              payload: None }
  }

  /// Create a new empty message that ACKs this one.
  ///
  /// The ACK shares this message's id and token.
  ///
  /// ```
  /// use wren_msg::{code, Id, Message, Type};
  ///
  /// let req = Message::new(Type::Con, code::GET, Id(7));
  /// let ack = req.ack();
  ///
  /// assert_eq!(ack.ty, Type::Ack);
  /// assert_eq!(ack.id, Id(7));
  /// assert_eq!(ack.code, code::EMPTY);
  /// ```
  pub fn ack(&self) -> Message<'static> {
    let mut ack = Message::new(Type::Ack, code::EMPTY, self.id);
    ack.token = self.token;
    ack
  }

  /// Create a new empty message that resets (rejects) this one.
  pub fn reset(&self) -> Message<'static> {
    let mut rst = Message::new(Type::Reset, code::EMPTY, self.id);
    rst.token = self.token;
    rst
  }

  /// Set the response code of this message
  pub fn set_status(&mut self, code: Code) {
    self.code = code;
  }

  /// Which known options are present
  pub fn options_present(&self) -> OptionSet {
    self.present
  }

  /// Is this option set?
  pub fn has(&self, opt: KnownOpt) -> bool {
    self.present.contains(opt)
  }

  /// Copy every borrowed value into storage owned by the message,
  /// so it may outlive the buffer it was parsed from.
  pub fn into_owned(self) -> Message<'static> {
    Message { id: self.id,
              ty: self.ty,
              ver: self.ver,
              token: self.token,
              code: self.code,
              present: self.present,
              if_match: self.if_match,
              uri_host: self.uri_host.into_owned(),
              etag: self.etag,
              observe: self.observe,
              uri_port: self.uri_port,
              location_path: self.location_path.into_owned(),
              uri_path: self.uri_path.into_owned(),
              content_type: self.content_type,
              max_age: self.max_age,
              uri_query: self.uri_query.into_owned(),
              accept: self.accept,
              location_query: self.location_query.into_owned(),
              block2: self.block2,
              block1: self.block1,
              size: self.size,
              proxy_uri: self.proxy_uri.into_owned(),
              payload: self.payload.map(Segment::into_owned) }
  }

  /// Exact number of bytes [`TryIntoBytes`](crate::TryIntoBytes) will write for this message
  pub fn get_size(&self) -> usize {
    let header_size = 4;
    let token_size = self.token.len();
    let payload_size = self.payload().map(|p| 1 + p.len()).unwrap_or(0);

    let mut prev = 0u32;
    let mut opts_size = 0;
    let mut add = |number: u32, len: usize| {
      opts_size += opt_size(number - prev, len);
      prev = number;
    };

    for opt in self.present.iter() {
      let n = opt.number().0;
      match opt {
        | KnownOpt::IfMatch => add(n, self.if_match.len()),
        | KnownOpt::UriHost => add(n, self.uri_host.len()),
        | KnownOpt::ETag => add(n, self.etag.len()),
        | KnownOpt::IfNoneMatch => add(n, 0),
        | KnownOpt::Observe => add(n, int_len(self.observe)),
        | KnownOpt::UriPort => add(n, int_len(self.uri_port.into())),
        | KnownOpt::LocationPath => self.location_path.iter().for_each(|s| add(n, s.len())),
        | KnownOpt::UriPath => self.uri_path.iter().for_each(|s| add(n, s.len())),
        | KnownOpt::ContentType => add(n, int_len(self.content_type.into())),
        | KnownOpt::MaxAge => add(n, int_len(self.max_age)),
        | KnownOpt::UriQuery => self.uri_query.iter().for_each(|s| add(n, s.len())),
        | KnownOpt::Accept => self.accept.iter().for_each(|a| add(n, int_len((*a).into()))),
        | KnownOpt::LocationQuery => self.location_query.iter().for_each(|s| add(n, s.len())),
        | KnownOpt::Block2 => add(n, int_len(self.block2.into())),
        | KnownOpt::Block1 => add(n, int_len(self.block1.into())),
        | KnownOpt::Size => add(n, int_len(self.size)),
        | KnownOpt::ProxyUri => add(n, self.proxy_uri.len()),
      }
    }

    header_size + token_size + opts_size + payload_size
  }

  /// Store one option parsed off the wire
  fn absorb(&mut self, opt: RawOpt<'a>) -> Result<(), OptParseError> {
    let known = match KnownOpt::from_number(opt.number) {
      | Some(known) => known,
      | None => match opt.number.must_be_processed() {
        | OptionMustBeProcessed::Yes => {
          return Err(OptParseError::UnrecognizedCritical(opt.number))
        },
        | OptionMustBeProcessed::No => {
          log::trace!("ignoring unrecognized elective option {}", opt.number);
          return Ok(());
        },
      },
    };

    if !known.value_len().contains(&opt.value.len()) {
      return Err(OptParseError::ValueLength { number: opt.number,
                                              len: opt.value.len() });
    }

    let int = || decode_int(opt.value);
    let bytes = || opt.value.iter().copied().collect::<ArrayVec<[u8; ETAG_LEN]>>();

    match known {
      | KnownOpt::IfMatch => self.if_match = bytes(),
      | KnownOpt::UriHost => self.uri_host = Segment::Borrowed(opt.value),
      | KnownOpt::ETag => self.etag = bytes(),
      | KnownOpt::IfNoneMatch => (),
      | KnownOpt::Observe => self.observe = int(),
      | KnownOpt::UriPort => self.uri_port = int() as u16,
      | KnownOpt::LocationPath => self.location_path.push(opt.value),
      | KnownOpt::UriPath => self.uri_path.push(opt.value),
      | KnownOpt::ContentType => self.content_type = int() as u16,
      | KnownOpt::MaxAge => self.max_age = int(),
      | KnownOpt::UriQuery => self.uri_query.push(opt.value),
      | KnownOpt::Accept if self.accept.len() < MAX_ACCEPT => self.accept.push(int() as u16),
      | KnownOpt::Accept => log::trace!("ignoring Accept beyond the first {}", MAX_ACCEPT),
      | KnownOpt::LocationQuery => self.location_query.push(opt.value),
      | KnownOpt::Block2 => self.block2 = Block::from(int()),
      | KnownOpt::Block1 => self.block1 = Block::from(int()),
      | KnownOpt::Size => self.size = int(),
      | KnownOpt::ProxyUri => self.proxy_uri = Segment::Borrowed(opt.value),
    }

    self.present.insert(known);
    Ok(())
  }
}

impl<'a> TryFromBytes<'a> for Message<'a> {
  type Error = MessageParseError;

  fn try_from_bytes(bytes: &'a [u8]) -> Result<Self, Self::Error> {
    let len = bytes.len();
    let mut bytes = Cursor::new(bytes);
    let header = bytes.take_exact(4).ok_or(HeaderError::TooShort(len))?;

    let Byte1 { tkl, ty, ver } = Byte1::from(header[0]);

    if ver.0 != VERSION {
      return Err(HeaderError::UnsupportedVersion(ver.0).into());
    }

    if tkl > 8 {
      return Err(HeaderError::InvalidTokenLength(tkl).into());
    }

    let code = Code::from(header[1]);
    let id = Id::from_be_bytes([header[2], header[3]]);

    let token = bytes.take_exact(tkl as usize)
                     .and_then(Token::try_from_slice)
                     .ok_or(HeaderError::TruncatedToken)?;

    let mut msg = Message::new(ty, code, id);
    msg.token = token;

    let mut prev = OptNumber(0);
    while let Some(opt) = parse_option(bytes.remaining(), prev)? {
      bytes.take_exact(opt.consumed);
      prev = opt.number;
      msg.absorb(opt)?;
    }

    if bytes.next().is_some() {
      // the only thing that stops option parsing early is the payload marker
      let payload = bytes.take_until_end();
      if payload.is_empty() {
        return Err(MessageParseError::EmptyPayload);
      }
      msg.payload = Some(Segment::Borrowed(payload));
    }

    debug_assert!(bytes.is_exhausted());
    Ok(msg)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_msg() {
    let (expect, msg) = crate::test_msg();
    assert_eq!(Message::try_from_bytes(&msg).unwrap(), expect)
  }

  #[test]
  fn parse_byte1() {
    let byte = 0b_01_10_0011u8;
    let byte = Byte1::from(byte);
    assert_eq!(byte,
               Byte1 { ver: Version(1),
                       ty: Type::Ack,
                       tkl: 3 })
  }

  #[test]
  fn serialize_byte1() {
    let byte = Byte1 { ver: Version(1),
                       ty: Type::Ack,
                       tkl: 3 };
    let actual: u8 = byte.into();
    crate::assert_eqb!(actual, 0b_01_10_0011u8)
  }

  #[test]
  fn header_errors() {
    assert_eq!(Message::try_from_bytes(&[0x40, 0x01, 0x00]),
               Err(MessageParseError::MalformedHeader(HeaderError::TooShort(3))));
    assert_eq!(Message::try_from_bytes(&[0b_10_00_0000, 0x01, 0x00, 0x01]),
               Err(MessageParseError::MalformedHeader(HeaderError::UnsupportedVersion(2))));
    assert_eq!(Message::try_from_bytes(&[0b_01_00_1001, 0x01, 0x00, 0x01, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
               Err(MessageParseError::MalformedHeader(HeaderError::InvalidTokenLength(9))));
    assert_eq!(Message::try_from_bytes(&[0b_01_00_0010, 0x01, 0x00, 0x01, 1]),
               Err(MessageParseError::MalformedHeader(HeaderError::TruncatedToken)));
  }

  #[test]
  fn option_errors() {
    let header = [0b_01_00_0000u8, 0x01, 0x00, 0x01];
    let parse = |opts: &[u8]| {
      let bytes = [header.as_ref(), opts].concat();
      Message::try_from_bytes(&bytes).map(|_| ())
    };

    // length 13+ needs an extension byte that isn't there
    assert_eq!(parse(&[0b1011_1101]),
               Err(MessageParseError::BadOption(OptParseError::UnexpectedEndOfStream)));
    // option 9 is odd & unknown
    assert_eq!(parse(&[0b1001_0000]),
               Err(MessageParseError::BadOption(OptParseError::UnrecognizedCritical(OptNumber(9)))));
    // option 19 (Token) lives in the header now
    assert_eq!(parse(&[0b1101_0000, 19 - 13]),
               Err(MessageParseError::BadOption(OptParseError::UnrecognizedCritical(OptNumber::TOKEN))));
    // Content-Type may be at most 2 bytes
    assert_eq!(parse(&[0b1100_0011, 0, 0, 1]),
               Err(MessageParseError::BadOption(OptParseError::ValueLength { number: OptNumber(12),
                                                                             len: 3 })));
  }

  #[test]
  fn unknown_elective_is_skipped() {
    // option 2 (elective, unknown) then Uri-Path (11) "a"
    let bytes = [0b_01_00_0000u8, 0x01, 0x00, 0x01, 0b0010_0001, 0xAA, 0b1001_0001, b'a'];
    let msg = Message::try_from_bytes(&bytes).unwrap();
    assert_eq!(msg.options_present().len(), 1);
    assert_eq!(msg.uri_path().join(b'/'), b"a".to_vec());
  }

  #[test]
  fn marker_without_payload() {
    let bytes = [0b_01_00_0000u8, 0x01, 0x00, 0x01, 0xFF];
    assert_eq!(Message::try_from_bytes(&bytes),
               Err(MessageParseError::EmptyPayload));
  }

  #[test]
  fn extra_accept_values_are_dropped() {
    // Accept 0, 40, 50
    let bytes = [0b_01_00_0000u8, 0x01, 0x00, 0x01, 0b1101_0000, 3, 0b0000_0001, 40, 0b0000_0001, 50];
    let msg = Message::try_from_bytes(&bytes).unwrap();
    assert_eq!(msg.accept(), Some([0u16, 40].as_ref()));
  }

  #[test]
  fn into_owned_outlives_buffer() {
    let owned = {
      let bytes = [0b_01_00_0000u8, 0x01, 0x00, 0x01, 0b1011_0011, b'f', b'o', b'o', 0xFF, b'!'];
      Message::try_from_bytes(&bytes).unwrap().into_owned()
    };
    assert!(owned.uri_path().iter().all(|s| !s.is_borrowed()));
    assert_eq!(owned.uri_path().join(b'/'), b"foo".to_vec());
    assert_eq!(owned.payload(), Some(b"!".as_ref()));
  }
}
