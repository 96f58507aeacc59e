use core::fmt;

use std_alloc::vec::Vec;

/// One piece of a string or opaque option value.
///
/// `Borrowed` segments point into memory the message does not own (the
/// datagram it was parsed from, or a `&'a str` handed to a setter) and are
/// never freed by it. `Owned` segments are released when the message is.
#[derive(Clone, Eq)]
pub enum Segment<'a> {
  /// View into caller-owned memory
  Borrowed(&'a [u8]),
  /// Storage owned by the message
  Owned(Vec<u8>),
}

impl<'a> Segment<'a> {
  /// The bytes of this segment
  pub fn as_bytes(&self) -> &[u8] {
    match self {
      | Segment::Borrowed(b) => b,
      | Segment::Owned(v) => v.as_slice(),
    }
  }

  /// The bytes as UTF-8, if they are
  pub fn as_str(&self) -> Option<&str> {
    core::str::from_utf8(self.as_bytes()).ok()
  }

  /// Length in bytes
  pub fn len(&self) -> usize {
    self.as_bytes().len()
  }

  /// Whether this segment has zero length
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Whether this segment's storage belongs to someone else
  pub fn is_borrowed(&self) -> bool {
    matches!(self, Segment::Borrowed(_))
  }

  /// Copy borrowed bytes so the segment no longer depends on `'a`
  pub fn into_owned(self) -> Segment<'static> {
    match self {
      | Segment::Borrowed(b) => Segment::Owned(b.to_vec()),
      | Segment::Owned(v) => Segment::Owned(v),
    }
  }
}

impl<'a> Default for Segment<'a> {
  fn default() -> Self {
    Segment::Borrowed(&[])
  }
}

/// Segments compare by content; ownership is not part of equality.
impl<'a, 'b> PartialEq<Segment<'b>> for Segment<'a> {
  fn eq(&self, other: &Segment<'b>) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl<'a> fmt::Debug for Segment<'a> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let tag = if self.is_borrowed() { "Borrowed" } else { "Owned" };
    match self.as_str() {
      | Some(s) => write!(f, "{}({:?})", tag, s),
      | None => write!(f, "{}({:?})", tag, self.as_bytes()),
    }
  }
}

impl<'a> AsRef<[u8]> for Segment<'a> {
  fn as_ref(&self) -> &[u8] {
    self.as_bytes()
  }
}

impl<'a> From<&'a [u8]> for Segment<'a> {
  fn from(b: &'a [u8]) -> Self {
    Segment::Borrowed(b)
  }
}

impl<'a> From<&'a str> for Segment<'a> {
  fn from(s: &'a str) -> Self {
    Segment::Borrowed(s.as_bytes())
  }
}

impl From<Vec<u8>> for Segment<'static> {
  fn from(v: Vec<u8>) -> Self {
    Segment::Owned(v)
  }
}

/// Split `value` on `sep` the way multi-value options are exploded.
///
/// Leading separators are skipped and a single trailing separator does not
/// produce an empty final piece, but empty pieces between two separators
/// are kept (`"a//b"` has three segments).
pub(crate) fn split(value: &[u8], sep: u8) -> impl Iterator<Item = &[u8]> {
  let start = value.iter().position(|b| *b != sep).unwrap_or(value.len());
  let trimmed = &value[start..];
  let trimmed = trimmed.strip_suffix(&[sep]).unwrap_or(trimmed);
  let nothing = trimmed.is_empty();

  trimmed.split(move |b| *b == sep).filter(move |_| !nothing)
}

/// The ordered values of a repeatable option (Uri-Path, Uri-Query,
/// Location-Path, Location-Query).
///
/// Order is insertion order and is significant: joining the segments
/// with the option's separator rebuilds the original string.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Segments<'a>(Vec<Segment<'a>>);

impl<'a> Segments<'a> {
  /// An empty sequence
  pub fn new() -> Self {
    Self(Vec::new())
  }

  /// Split `value` on `sep` into borrowed segments; see [`Message::set_uri_path`](crate::Message::set_uri_path)
  pub fn split(value: &'a [u8], sep: u8) -> Self {
    Self(split(value, sep).map(Segment::Borrowed).collect())
  }

  /// Append a segment
  pub fn push(&mut self, seg: impl Into<Segment<'a>>) {
    self.0.push(seg.into())
  }

  /// Iterate over the segments in order
  pub fn iter(&self) -> impl Iterator<Item = &Segment<'a>> {
    self.0.iter()
  }

  /// Number of segments
  pub fn len(&self) -> usize {
    self.0.len()
  }

  /// Whether there are no segments
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Join the segments with `sep` between each
  ///
  /// ```
  /// use wren_msg::Segments;
  ///
  /// let segs = Segments::split(b"a/b/c", b'/');
  /// assert_eq!(segs.len(), 3);
  /// assert_eq!(segs.join(b'/'), b"a/b/c".to_vec());
  /// ```
  pub fn join(&self, sep: u8) -> Vec<u8> {
    let len = self.iter().map(|s| s.len() + 1).sum::<usize>();
    let mut out = Vec::with_capacity(len);

    self.iter().enumerate().for_each(|(ix, seg)| {
                              if ix > 0 {
                                out.push(sep);
                              }
                              out.extend_from_slice(seg.as_bytes());
                            });

    out
  }

  /// Copy borrowed segments so the sequence no longer depends on `'a`
  pub fn into_owned(self) -> Segments<'static> {
    Segments(self.0.into_iter().map(Segment::into_owned).collect())
  }
}

impl<'a> fmt::Debug for Segments<'a> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.0.iter()).finish()
  }
}

impl<'a> FromIterator<Segment<'a>> for Segments<'a> {
  fn from_iter<T: IntoIterator<Item = Segment<'a>>>(iter: T) -> Self {
    Self(iter.into_iter().collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pieces(s: &str, sep: u8) -> Vec<&[u8]> {
    split(s.as_bytes(), sep).collect()
  }

  #[test]
  fn split_edges() {
    assert_eq!(pieces("a/b/c", b'/'), vec![b"a".as_ref(), b"b", b"c"]);
    assert_eq!(pieces("/a/b/", b'/'), vec![b"a".as_ref(), b"b"]);
    assert_eq!(pieces("a//b", b'/'), vec![b"a".as_ref(), b"", b"b"]);
    assert_eq!(pieces("", b'/'), Vec::<&[u8]>::new());
    assert_eq!(pieces("///", b'/'), Vec::<&[u8]>::new());
    assert_eq!(pieces("x=1&y=2", b'&'), vec![b"x=1".as_ref(), b"y=2"]);
  }

  #[test]
  fn ownership_is_not_equality() {
    let borrowed = Segment::from("abc");
    let owned = borrowed.clone().into_owned();
    assert!(borrowed.is_borrowed());
    assert!(!owned.is_borrowed());
    assert_eq!(borrowed, owned);
  }

  #[test]
  fn join_roundtrip() {
    let segs = Segments::split(b"a//b", b'/');
    assert_eq!(segs.join(b'/'), b"a//b".to_vec());
    assert_eq!(Segments::new().join(b'/'), Vec::<u8>::new());
  }
}
