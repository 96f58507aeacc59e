use super::OptNumber;

/// Errors encounterable while parsing an option from bytes
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, PartialOrd, Eq, Ord)]
pub enum OptParseError {
  /// Reached end of stream before the option header
  /// or value was finished
  #[error("datagram ended inside an option")]
  UnexpectedEndOfStream,

  /// Option Delta was set to 15, which is invalid.
  #[error("option delta nibble {0} is reserved")]
  OptionDeltaReservedValue(u8),

  /// Value Length was set to 15, which is invalid.
  #[error("option length nibble {0} is reserved")]
  ValueLengthReservedValue(u8),

  /// A critical (odd-numbered) option that this crate does not understand
  #[error("unrecognized critical option {0}")]
  UnrecognizedCritical(OptNumber),

  /// A known option whose value was outside the lengths it allows
  #[error("option {number} may not be {len} bytes long")]
  ValueLength {
    /// The option
    number: OptNumber,
    /// The length on the wire
    len: usize,
  },

  /// Running sum of option deltas no longer fits
  #[error("option number overflowed")]
  NumberOverflow,
}

impl OptParseError {
  /// Shorthand for [`OptParseError::UnexpectedEndOfStream`]
  pub fn eof() -> Self {
    Self::UnexpectedEndOfStream
  }
}
