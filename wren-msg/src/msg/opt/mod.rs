use core::fmt;

use tinyvec::ArrayVec;

use crate::cursor::Cursor;
use crate::MessageToBytesError;

/// Options this crate understands
pub mod known;
pub use known::*;

/// Option parsing errors
pub mod parse_error;
pub use parse_error::*;

/// Values of string & repeatable options
pub mod segment;
pub use segment::*;

/// Option Number, identifying which option is being set
/// (e.g. Content-Type has a Number of 12).
///
/// On the wire options carry the _delta_ from the previous option's number
/// rather than the number itself, so numbers only exist in the context of
/// the options before them. [`parse_option`] computes them for you.
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct OptNumber(pub u32);

impl OptNumber {
  /// Option number the Token occupied before it moved into the header.
  ///
  /// It is odd (critical) and not understood, so receiving it is an error.
  pub const TOKEN: OptNumber = OptNumber(19);

  /// Whether or not this option may be ignored by a receiver
  /// that does not understand it
  pub fn must_be_processed(&self) -> OptionMustBeProcessed {
    #[allow(clippy::wildcard_in_or_patterns)] // will only ever be 0 or 1
    match self.0 & 0b1 {
      | 1 => OptionMustBeProcessed::Yes,
      | 0 | _ => OptionMustBeProcessed::No,
    }
  }
}

impl fmt::Display for OptNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Whether an unrecognized option may be skipped
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum OptionMustBeProcessed {
  /// This option must be processed,
  /// and a message that contains it but isn't understood
  /// will be rejected.
  ///
  /// Corresponds to the option being "critical"
  /// in strict CoAP terms
  Yes,
  /// This option does not _need_ to
  /// be processed, and is silently skipped if unknown.
  ///
  /// Corresponds to the option being "elective"
  /// in strict CoAP terms
  No,
}

/// An option as it appeared on the wire, value borrowed from the datagram
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawOpt<'a> {
  /// Absolute option number (previous number + delta)
  pub number: OptNumber,
  /// The value bytes; `value.len()` is the option length
  pub value: &'a [u8],
  /// Bytes of input used by the header and value together
  pub consumed: usize,
}

pub(crate) fn parse_opt_len_or_delta(head: u8,
                                     bytes: &mut Cursor<'_>,
                                     reserved_err: OptParseError)
                                     -> Result<u32, OptParseError> {
  match head {
    | 13 => {
      let n = bytes.next().ok_or_else(OptParseError::eof)?;
      Ok(u32::from(n) + 13)
    },
    | 14 => match bytes.take_exact(2) {
      | Some(&[a, b]) => Ok(u32::from(u16::from_be_bytes([a, b])) + 269),
      | _ => Err(OptParseError::eof()),
    },
    | 15 => Err(reserved_err),
    | _ => Ok(u32::from(head)),
  }
}

/// Read the option at the start of `src`, given the number of the option before it
/// (`OptNumber(0)` for the first).
///
/// Yields `Ok(None)` when there are no more options; `src` is empty or
/// starts with the payload marker `0xFF`.
///
/// ```
/// use wren_msg::{parse_option, OptNumber};
///
/// // delta 11 (Uri-Path), length 3
/// let bytes = [0b1011_0011, b'f', b'o', b'o', 0xFF, b'!'];
/// let opt = parse_option(&bytes, OptNumber(0)).unwrap().unwrap();
/// assert_eq!(opt.number, OptNumber(11));
/// assert_eq!(opt.value, b"foo");
/// assert_eq!(opt.consumed, 4);
///
/// assert_eq!(parse_option(&bytes[4..], opt.number), Ok(None));
/// ```
pub fn parse_option<'a>(src: &'a [u8],
                        prev: OptNumber)
                        -> Result<Option<RawOpt<'a>>, OptParseError> {
  let mut bytes = Cursor::new(src);

  let head = match bytes.peek() {
    | None | Some(0b11111111) => return Ok(None),
    | Some(b) => b,
  };
  bytes.next();

  // NOTE: the delta's extended bytes come before the length's
  let delta = parse_opt_len_or_delta(head >> 4,
                                     &mut bytes,
                                     OptParseError::OptionDeltaReservedValue(15))?;
  let len = parse_opt_len_or_delta(head & 0b00001111,
                                   &mut bytes,
                                   OptParseError::ValueLengthReservedValue(15))?
            as usize;

  let value = bytes.take_exact(len).ok_or_else(OptParseError::eof)?;
  let number = prev.0
                   .checked_add(delta)
                   .map(OptNumber)
                   .ok_or(OptParseError::NumberOverflow)?;

  Ok(Some(RawOpt { number,
                   value,
                   consumed: bytes.position() }))
}

/// Largest delta or length the 3-tier header can express
pub const MAX_OPT_LEN_OR_DELTA: u32 = 65804;

pub(crate) fn opt_len_or_delta(val: u32) -> Result<(u8, ArrayVec<[u8; 2]>), MessageToBytesError> {
  let mut bytes = ArrayVec::new();
  match val {
    | n if n > MAX_OPT_LEN_OR_DELTA => Err(MessageToBytesError::OptionTooLarge(n)),
    | n if n >= 269 => {
      bytes.extend(((n - 269) as u16).to_be_bytes());
      Ok((14, bytes))
    },
    | n if n >= 13 => {
      bytes.push((n - 13) as u8);
      Ok((13, bytes))
    },
    | n => Ok((n as u8, bytes)),
  }
}

fn ext_len(val: usize) -> usize {
  match val {
    | n if n >= 269 => 2,
    | n if n >= 13 => 1,
    | _ => 0,
  }
}

/// Bytes an option with this delta and value length occupies on the wire
pub fn opt_size(delta: u32, len: usize) -> usize {
  1 + ext_len(delta as usize) + ext_len(len) + len
}

/// Bytes of the minimal big-endian form of `n` (0 for 0)
pub fn int_len(n: u32) -> usize {
  4 - (n.leading_zeros() / 8) as usize
}

fn delta(number: OptNumber, prev: OptNumber) -> Result<u32, MessageToBytesError> {
  number.0
        .checked_sub(prev.0)
        .ok_or(MessageToBytesError::OptionsOutOfOrder { prev, number })
}

fn write_opt(dest: &mut [u8], delta: u32, value: &[u8]) -> Result<usize, MessageToBytesError> {
  let len = u32::try_from(value.len()).unwrap_or(u32::MAX);
  let (del, del_bytes) = opt_len_or_delta(delta)?;
  let (len, len_bytes) = opt_len_or_delta(len)?;

  let size = 1 + del_bytes.len() + len_bytes.len() + value.len();
  if dest.len() < size {
    return Err(MessageToBytesError::BufferTooSmall { capacity: dest.len(),
                                                     size });
  }

  dest[0] = del << 4 | len;
  let mut at = 1;
  for ext in [del_bytes, len_bytes] {
    dest[at..at + ext.len()].copy_from_slice(&ext);
    at += ext.len();
  }
  dest[at..size].copy_from_slice(value);

  Ok(size)
}

/// Write an unsigned integer option using the fewest value bytes possible
/// (none at all for `0`).
///
/// ```
/// use wren_msg::{serialize_int, OptNumber};
///
/// let mut buf = [0u8; 8];
/// // Max-Age (14) following Content-Type (12)
/// let n = serialize_int(OptNumber(14), OptNumber(12), &mut buf, 256).unwrap();
/// assert_eq!(&buf[..n], &[0b0010_0010, 1, 0]);
/// ```
pub fn serialize_int(number: OptNumber,
                     prev: OptNumber,
                     dest: &mut [u8],
                     value: u32)
                     -> Result<usize, MessageToBytesError> {
  let bytes = value.to_be_bytes();
  write_opt(dest, delta(number, prev)?, &bytes[4 - int_len(value)..])
}

/// Write an opaque or string option.
///
/// With a `separator`, the value is split and written as consecutive options
/// sharing `number` (so `"a/b/c"` with `/` becomes three Uri-Path options).
/// Leading separators are skipped and a trailing one does not produce an empty option.
///
/// ```
/// use wren_msg::{serialize_bytes, OptNumber};
///
/// let mut buf = [0u8; 16];
/// let n = serialize_bytes(OptNumber(11), OptNumber(0), &mut buf, b"a/b", Some(b'/')).unwrap();
/// assert_eq!(&buf[..n], &[0b1011_0001, b'a', 0b0000_0001, b'b']);
/// ```
pub fn serialize_bytes(number: OptNumber,
                       prev: OptNumber,
                       dest: &mut [u8],
                       value: &[u8],
                       separator: Option<u8>)
                       -> Result<usize, MessageToBytesError> {
  match separator {
    | None => write_opt(dest, delta(number, prev)?, value),
    | Some(sep) => {
      let mut written = 0;
      let mut prev = prev;
      for piece in segment::split(value, sep) {
        written += write_opt(&mut dest[written..], delta(number, prev)?, piece)?;
        prev = number;
      }
      Ok(written)
    },
  }
}

/// Write one option per segment, all with `number`.
///
/// Only the first carries a nonzero delta.
pub fn serialize_multi(number: OptNumber,
                       prev: OptNumber,
                       dest: &mut [u8],
                       segments: &Segments<'_>)
                       -> Result<usize, MessageToBytesError> {
  let mut written = 0;
  let mut prev = prev;
  for seg in segments.iter() {
    written += write_opt(&mut dest[written..], delta(number, prev)?, seg.as_bytes())?;
    prev = number;
  }
  Ok(written)
}

/// Reconstruct an unsigned integer from its big-endian bytes, left-padding
/// with zeroes. Callers guarantee `bytes.len() <= 4`.
pub(crate) fn decode_int(bytes: &[u8]) -> u32 {
  bytes.iter()
       .fold(0u32, |n, b| n.wrapping_shl(8) | u32::from(*b))
}

#[cfg(test)]
mod tests {
  use core::iter::repeat;

  use super::*;
  use crate::assert_eqb_iter;

  #[test]
  fn parse_opt() {
    let opt = parse_option(&[0b00010001, 0b00000001], OptNumber(0)).unwrap()
                                                                   .unwrap();
    assert_eq!(opt,
               RawOpt { number: OptNumber(1),
                        value: &[1],
                        consumed: 2 });

    let opt = parse_option(&[0b11010001, 0b00000001, 0b00000001], OptNumber(0)).unwrap()
                                                                                .unwrap();
    assert_eq!(opt.number, OptNumber(14));
    assert_eq!(opt.value, &[1]);

    let opt = parse_option(&[0b11100001, 0b00000000, 0b00000001, 0b00000001],
                           OptNumber(0)).unwrap()
                                        .unwrap();
    assert_eq!(opt.number, OptNumber(270));
    assert_eq!(opt.consumed, 4);
  }

  #[test]
  fn parse_opt_is_relative_to_prev() {
    let opt = parse_option(&[0b0000_0000], OptNumber(11)).unwrap().unwrap();
    assert_eq!(opt.number, OptNumber(11));
    assert_eq!(opt.value, &[]);
  }

  #[test]
  fn parse_opt_errors() {
    // extended length byte missing
    assert_eq!(parse_option(&[0b0001_1101], OptNumber(0)),
               Err(OptParseError::UnexpectedEndOfStream));
    // two-byte extended delta cut short
    assert_eq!(parse_option(&[0b1110_0000, 0], OptNumber(0)),
               Err(OptParseError::UnexpectedEndOfStream));
    // value shorter than claimed
    assert_eq!(parse_option(&[0b0001_0011, 1, 2], OptNumber(0)),
               Err(OptParseError::UnexpectedEndOfStream));
    assert_eq!(parse_option(&[0b1111_0000], OptNumber(0)),
               Err(OptParseError::OptionDeltaReservedValue(15)));
    assert_eq!(parse_option(&[0b0001_1111], OptNumber(0)),
               Err(OptParseError::ValueLengthReservedValue(15)));
  }

  #[test]
  fn opt() {
    let cases: [(u32, Vec<u8>, Vec<u8>); 4] =
      [(24,
        repeat(1).take(100).collect(),
        [[0b1101_1101u8, 24 - 13, 100 - 13].as_ref(),
         repeat(1).take(100).collect::<Vec<u8>>().as_ref()].concat()),
       (1, vec![1], vec![0b0001_0001, 1]),
       (24, vec![1], vec![0b1101_0001, 11, 1]),
       (24,
        repeat(1).take(300).collect(),
        [[0b1101_1110, 24 - 13].as_ref(),
         (300u16 - 269).to_be_bytes().as_ref(),
         repeat(1).take(300).collect::<Vec<u8>>().as_ref()].concat())];

    cases.into_iter().for_each(|(number, value, expected)| {
                       let mut actual = vec![0u8; expected.len()];
                       let n = serialize_bytes(OptNumber(number),
                                               OptNumber(0),
                                               &mut actual,
                                               &value,
                                               None).unwrap();
                       assert_eq!(n, expected.len());
                       assert_eq!(opt_size(number, value.len()), n);
                       assert_eqb_iter!(actual, expected)
                     });
  }

  #[test]
  fn minimal_ints() {
    let mut buf = [0u8; 8];

    let n = serialize_int(OptNumber(14), OptNumber(0), &mut buf, 0).unwrap();
    assert_eq!(&buf[..n], &[0b1101_0000, 1]);

    let n = serialize_int(OptNumber(12), OptNumber(0), &mut buf, 255).unwrap();
    assert_eq!(&buf[..n], &[0b1100_0001, 255]);

    let n = serialize_int(OptNumber(12), OptNumber(0), &mut buf, 256).unwrap();
    assert_eq!(&buf[..n], &[0b1100_0010, 1, 0]);

    assert_eq!(int_len(0), 0);
    assert_eq!(int_len(0xFFFF_FFFF), 4);
    assert_eq!(decode_int(&[1, 0]), 256);
    assert_eq!(decode_int(&[]), 0);
  }

  #[test]
  fn too_large() {
    let value = vec![0u8; 65805];
    let mut buf = vec![0u8; 70_000];
    assert_eq!(serialize_bytes(OptNumber(1), OptNumber(0), &mut buf, &value, None),
               Err(MessageToBytesError::OptionTooLarge(65805)));
  }

  #[test]
  fn buffer_too_small() {
    let mut buf = [0u8; 2];
    assert_eq!(serialize_bytes(OptNumber(3), OptNumber(0), &mut buf, b"host", None),
               Err(MessageToBytesError::BufferTooSmall { capacity: 2,
                                                         size: 5 }));
  }

  #[test]
  fn out_of_order() {
    let mut buf = [0u8; 4];
    assert_eq!(serialize_int(OptNumber(3), OptNumber(11), &mut buf, 1),
               Err(MessageToBytesError::OptionsOutOfOrder { prev: OptNumber(11),
                                                            number: OptNumber(3) }));
  }

  #[test]
  fn multi_shares_number() {
    let segs = Segments::split(b"a/bc", b'/');
    let mut buf = [0u8; 16];
    let n = serialize_multi(OptNumber(11), OptNumber(3), &mut buf, &segs).unwrap();
    assert_eq!(&buf[..n], &[0b1000_0001, b'a', 0b0000_0010, b'b', b'c']);

    let mut split = [0u8; 16];
    let m = serialize_bytes(OptNumber(11), OptNumber(3), &mut split, b"/a/bc/", Some(b'/')).unwrap();
    assert_eq!(&split[..m], &buf[..n]);
  }
}
