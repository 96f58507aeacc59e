/// A cursor over a borrowed byte slice.
///
/// Unlike [`std::io::Cursor`], everything it yields borrows the underlying
/// slice (`'a`) rather than the cursor, so parsed values may outlive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor<'a> {
  bytes: &'a [u8],
  cursor: usize,
}

impl<'a> Cursor<'a> {
  /// Creates a new cursor
  pub(crate) fn new(bytes: &'a [u8]) -> Self {
    Cursor { bytes, cursor: 0 }
  }

  /// Take the next byte in the cursor, returning None
  /// if the cursor is exhausted.
  pub(crate) fn next(&mut self) -> Option<u8> {
    self.take_exact(1).map(|a| a[0])
  }

  /// Look at the next byte without advancing
  pub(crate) fn peek(&self) -> Option<u8> {
    self.bytes.get(self.cursor).copied()
  }

  /// Take `n` bytes from the cursor, returning None if
  /// fewer than `n` remain (in which case nothing is consumed).
  pub(crate) fn take_exact(&mut self, n: usize) -> Option<&'a [u8]> {
    let end = self.cursor.checked_add(n)?;
    let out = self.bytes.get(self.cursor..end)?;
    self.cursor = end;
    Some(out)
  }

  /// Consume and yield every remaining byte
  pub(crate) fn take_until_end(&mut self) -> &'a [u8] {
    let out = self.remaining();
    self.cursor = self.bytes.len();
    out
  }

  /// The bytes that have not been consumed yet
  pub(crate) fn remaining(&self) -> &'a [u8] {
    self.bytes.get(self.cursor..).unwrap_or(&[])
  }

  /// Whether every byte has been consumed
  pub(crate) fn is_exhausted(&self) -> bool {
    self.cursor >= self.bytes.len()
  }

  /// Number of bytes consumed so far
  pub(crate) fn position(&self) -> usize {
    self.cursor
  }
}
