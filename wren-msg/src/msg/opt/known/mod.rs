use core::ops::RangeInclusive;

use super::OptNumber;

/// Block1 & Block2 option values
pub mod block;
pub use block::*;

/// Content-Type option values
pub mod content_format;
pub use content_format::*;

/// What kind of value an option carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptFormat {
  /// No value at all
  Empty,
  /// Opaque bytes
  Opaque,
  /// Unsigned integer, minimal big-endian
  Uint,
  /// UTF-8 text
  String,
}

macro_rules! known_opts {
  ($($(#[$meta:meta])* $name:ident = $num:literal, $fmt:ident, $min:literal..=$max:literal, repeat: $repeat:literal;)*) => {
    /// The options this crate understands, in ascending option number order.
    ///
    /// Each has a typed slot in [`Message`](crate::Message) and one bit in its presence set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum KnownOpt {
      $($(#[$meta])* $name,)*
    }

    impl KnownOpt {
      /// Every known option, ascending by number
      pub const ALL: &'static [KnownOpt] = &[$(KnownOpt::$name,)*];

      /// The option number on the wire
      pub const fn number(&self) -> OptNumber {
        match self {
          $(| KnownOpt::$name => OptNumber($num),)*
        }
      }

      /// Look up an option by number
      pub fn from_number(n: OptNumber) -> Option<KnownOpt> {
        match n.0 {
          $(| $num => Some(KnownOpt::$name),)*
          | _ => None,
        }
      }

      /// Kind of value carried
      pub const fn format(&self) -> OptFormat {
        match self {
          $(| KnownOpt::$name => OptFormat::$fmt,)*
        }
      }

      /// Lengths (in bytes) a value may have
      pub const fn value_len(&self) -> RangeInclusive<usize> {
        match self {
          $(| KnownOpt::$name => $min..=$max,)*
        }
      }

      /// Whether the option may appear more than once
      pub const fn repeatable(&self) -> bool {
        match self {
          $(| KnownOpt::$name => $repeat,)*
        }
      }
    }
  };
}

known_opts! {
  /// If-Match (1)
  IfMatch = 1, Opaque, 0..=8, repeat: false;
  /// Uri-Host (3)
  UriHost = 3, String, 1..=255, repeat: false;
  /// ETag (4)
  ETag = 4, Opaque, 1..=8, repeat: false;
  /// If-None-Match (5)
  IfNoneMatch = 5, Empty, 0..=0, repeat: false;
  /// Observe (6)
  Observe = 6, Uint, 0..=3, repeat: false;
  /// Uri-Port (7)
  UriPort = 7, Uint, 0..=2, repeat: false;
  /// Location-Path (8)
  LocationPath = 8, String, 0..=255, repeat: true;
  /// Uri-Path (11)
  UriPath = 11, String, 0..=255, repeat: true;
  /// Content-Type (12)
  ContentType = 12, Uint, 0..=2, repeat: false;
  /// Max-Age (14)
  MaxAge = 14, Uint, 0..=4, repeat: false;
  /// Uri-Query (15)
  UriQuery = 15, String, 0..=270, repeat: true;
  /// Accept (16)
  Accept = 16, Uint, 0..=2, repeat: true;
  /// Location-Query (20)
  LocationQuery = 20, String, 1..=270, repeat: true;
  /// Block2 (23)
  Block2 = 23, Uint, 0..=3, repeat: false;
  /// Block1 (27)
  Block1 = 27, Uint, 0..=3, repeat: false;
  /// Size (28)
  Size = 28, Uint, 0..=4, repeat: false;
  /// Proxy-Uri (35)
  ProxyUri = 35, String, 1..=270, repeat: false;
}

/// Set of [`KnownOpt`]s, one bit each.
///
/// Bits are keyed by option number, which tops out at 35.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OptionSet(u64);

impl OptionSet {
  /// The empty set
  pub const fn new() -> Self {
    Self(0)
  }

  fn bit(opt: KnownOpt) -> u64 {
    1 << opt.number().0
  }

  /// Mark an option present
  pub fn insert(&mut self, opt: KnownOpt) {
    self.0 |= Self::bit(opt);
  }

  /// Mark an option absent
  pub fn remove(&mut self, opt: KnownOpt) {
    self.0 &= !Self::bit(opt);
  }

  /// Is the option present?
  pub fn contains(&self, opt: KnownOpt) -> bool {
    self.0 & Self::bit(opt) != 0
  }

  /// Number of options present
  pub fn len(&self) -> usize {
    self.0.count_ones() as usize
  }

  /// Whether no options are present
  pub fn is_empty(&self) -> bool {
    self.0 == 0
  }

  /// Present options in ascending number order
  pub fn iter(&self) -> impl Iterator<Item = KnownOpt> + '_ {
    KnownOpt::ALL.iter().copied().filter(|o| self.contains(*o))
  }
}
