/// Trait for converting a sequence of bytes into some data structure
/// that may borrow from them.
pub trait TryFromBytes<'a>: Sized {
  /// Error type yielded if conversion fails
  type Error;

  /// Try to convert from some sequence of bytes
  /// into `Self`
  fn try_from_bytes(bytes: &'a [u8]) -> Result<Self, Self::Error>;
}
