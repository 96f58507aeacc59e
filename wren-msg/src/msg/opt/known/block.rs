use crate::SetOptionError;

/// Value of a Block1 or Block2 option.
///
/// Three items of information are packed into one integer:
/// * the size of the block ([`Block::size`]), as an exponent `szx` with `size = 16 << szx`
/// * whether more blocks are following ([`Block::more`])
/// * the relative number of the block ([`Block::num`]) within a sequence of blocks with the given size.
///
/// ```text
/// num (up to 20 bits)   more  szx
/// xxxxxxxxxxxxxxxxxxxx  x     xxx
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Block(u32);

impl Block {
  /// Largest block number that fits in the option
  pub const MAX_NUM: u32 = 0x0F_FFFF;

  /// Create a block option value.
  ///
  /// `size` is rounded down to a power of two; sizes below 16
  /// or above 2048 and block numbers above [`Block::MAX_NUM`] are rejected.
  ///
  /// ```
  /// use wren_msg::Block;
  ///
  /// let block = Block::new(5, true, 64).unwrap();
  /// assert_eq!(u32::from(block), 0x5A);
  /// ```
  pub fn new(num: u32, more: bool, size: u16) -> Result<Self, SetOptionError> {
    if num > Self::MAX_NUM {
      return Err(SetOptionError::BlockNumberTooLarge(num));
    }

    if !(16..=2048).contains(&size) {
      return Err(SetOptionError::InvalidBlockSize(size));
    }

    let szx = (size / 16).ilog2();
    let more = u32::from(more) << 3;

    Ok(Self(num << 4 | more | szx))
  }

  /// Size of each block, in bytes
  pub fn size(&self) -> u16 {
    16 << (self.0 & 0b111)
  }

  /// Whether more blocks follow this one
  pub fn more(&self) -> bool {
    (self.0 & 0b1000) >> 3 == 1
  }

  /// Index of this block
  pub fn num(&self) -> u32 {
    self.0 >> 4
  }

  /// Offset in bytes of this block within the whole body
  pub fn offset(&self) -> u64 {
    u64::from(self.num()) * u64::from(self.size())
  }
}

impl From<Block> for u32 {
  fn from(b: Block) -> Self {
    b.0
  }
}

impl From<u32> for Block {
  fn from(n: u32) -> Self {
    Block(n)
  }
}
