use super::*;
use crate::consts::{MAX_ACCEPT, MAX_CHUNK_SIZE, TOKEN_LEN};

/// Errors encounterable while setting an option, token or payload
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, PartialOrd, Eq, Ord)]
pub enum SetOptionError {
  /// The value is longer than the option allows
  #[error("value of length {len} too long for option {number}")]
  ValueTooLong {
    /// The option
    number: OptNumber,
    /// The offending length
    len: usize,
  },

  /// The value is shorter than the option allows
  #[error("value of length {len} too short for option {number}")]
  ValueTooShort {
    /// The option
    number: OptNumber,
    /// The offending length
    len: usize,
  },

  /// Accept already holds as many values as a message may carry
  #[error("Accept already holds {max} values", max = MAX_ACCEPT)]
  AcceptListFull,

  /// Block numbers are at most 20 bits wide
  #[error("block number {0} does not fit in 20 bits")]
  BlockNumberTooLarge(u32),

  /// Block sizes must be between 16 and 2048 bytes
  #[error("block size {0} not in 16..=2048")]
  InvalidBlockSize(u16),

  /// Tokens are at most 8 bytes
  #[error("token of length {0} longer than {max}", max = TOKEN_LEN)]
  TokenTooLong(usize),
}

fn check_len(opt: KnownOpt, len: usize) -> Result<(), SetOptionError> {
  let range = opt.value_len();
  let number = opt.number();

  if len > *range.end() {
    Err(SetOptionError::ValueTooLong { number, len })
  } else if len < *range.start() {
    Err(SetOptionError::ValueTooShort { number, len })
  } else {
    Ok(())
  }
}

fn check_segments(opt: KnownOpt, segs: &Segments<'_>) -> Result<(), SetOptionError> {
  segs.iter().try_for_each(|s| check_len(opt, s.len()))
}

fn find_var<'s>(pairs: impl Iterator<Item = &'s [u8]>, name: &str) -> Option<&'s [u8]> {
  pairs.filter_map(|pair| {
         let eq = pair.iter().position(|b| *b == b'=')?;
         Some((&pair[..eq], &pair[eq + 1..]))
       })
       .find(|(key, _)| *key == name.as_bytes())
       .map(|(_, value)| value)
}

impl<'a> Message<'a> {
  fn get<'s, T>(&'s self, opt: KnownOpt, f: impl FnOnce(&'s Self) -> T) -> Option<T> {
    if self.present.contains(opt) {
      Some(f(self))
    } else {
      None
    }
  }

  fn mark(&mut self, opt: KnownOpt, present: bool) {
    if present {
      self.present.insert(opt);
    } else {
      self.present.remove(opt);
    }
  }

  /// Remove an option from the message
  ///
  /// The option's slot goes back to what [`Message::new`] puts there, so a
  /// message with an option removed equals one that never had it.
  pub fn remove(&mut self, opt: KnownOpt) {
    self.mark(opt, false);
    match opt {
      | KnownOpt::IfMatch => self.if_match.clear(),
      | KnownOpt::UriHost => self.uri_host = Segment::default(),
      | KnownOpt::ETag => self.etag.clear(),
      | KnownOpt::IfNoneMatch => (),
      | KnownOpt::Observe => self.observe = 0,
      | KnownOpt::UriPort => self.uri_port = 0,
      | KnownOpt::LocationPath => self.location_path = Segments::new(),
      | KnownOpt::UriPath => self.uri_path = Segments::new(),
      | KnownOpt::ContentType => self.content_type = 0,
      | KnownOpt::MaxAge => self.max_age = 0,
      | KnownOpt::UriQuery => self.uri_query = Segments::new(),
      | KnownOpt::Accept => self.accept.clear(),
      | KnownOpt::LocationQuery => self.location_query = Segments::new(),
      | KnownOpt::Block2 => self.block2 = Block::default(),
      | KnownOpt::Block1 => self.block1 = Block::default(),
      | KnownOpt::Size => self.size = 0,
      | KnownOpt::ProxyUri => self.proxy_uri = Segment::default(),
    }
  }

  /// Set the token, at most 8 bytes
  pub fn set_token(&mut self, token: &[u8]) -> Result<(), SetOptionError> {
    self.token = Token::try_from_slice(token).ok_or(SetOptionError::TokenTooLong(token.len()))?;
    Ok(())
  }

  /// Get the payload, if there is one
  pub fn payload(&self) -> Option<&[u8]> {
    self.payload.as_ref().map(Segment::as_bytes)
  }

  /// Set the payload.
  ///
  /// Payloads longer than [`MAX_CHUNK_SIZE`] are truncated to it, larger bodies
  /// should be split with Block1 / Block2. An empty payload removes it.
  ///
  /// ```
  /// use wren_msg::{code, consts::MAX_CHUNK_SIZE, Id, Message, Type};
  ///
  /// let body = [0u8; 200];
  /// let mut msg = Message::new(Type::Non, code::CONTENT, Id(1));
  /// msg.set_payload(&body);
  /// assert_eq!(msg.payload().map(|p| p.len()), Some(MAX_CHUNK_SIZE));
  ///
  /// msg.set_payload(&[]);
  /// assert_eq!(msg.payload(), None);
  /// ```
  pub fn set_payload(&mut self, payload: &'a [u8]) {
    let len = payload.len().min(MAX_CHUNK_SIZE);
    self.payload = Some(&payload[..len]).filter(|p| !p.is_empty())
                                        .map(Segment::Borrowed);
  }

  /// Get the value of the Content-Type option
  pub fn content_type(&self) -> Option<u16> {
    self.get(KnownOpt::ContentType, |m| m.content_type)
  }

  /// Get the Content-Type option as a [`ContentFormat`]
  pub fn content_format(&self) -> Option<ContentFormat> {
    self.content_type().map(ContentFormat::from)
  }

  /// Set the Content-Type option
  pub fn set_content_type(&mut self, ct: u16) {
    self.content_type = ct;
    self.mark(KnownOpt::ContentType, true);
  }

  /// Set the Content-Type option from a [`ContentFormat`]
  pub fn set_content_format(&mut self, format: ContentFormat) {
    self.set_content_type(format.into())
  }

  /// Get the value of the Max-Age option, in seconds
  pub fn max_age(&self) -> Option<u32> {
    self.get(KnownOpt::MaxAge, |m| m.max_age)
  }

  /// Set the Max-Age option, in seconds
  pub fn set_max_age(&mut self, secs: u32) {
    self.max_age = secs;
    self.mark(KnownOpt::MaxAge, true);
  }

  /// Get the value of the ETag option
  pub fn etag(&self) -> Option<&[u8]> {
    self.get(KnownOpt::ETag, |m| m.etag.as_slice())
  }

  /// Set the ETag option, 1 to 8 bytes
  pub fn set_etag(&mut self, etag: &[u8]) -> Result<(), SetOptionError> {
    check_len(KnownOpt::ETag, etag.len())?;
    self.etag = etag.iter().copied().collect();
    self.mark(KnownOpt::ETag, true);
    Ok(())
  }

  /// Get the value of the If-Match option
  pub fn if_match(&self) -> Option<&[u8]> {
    self.get(KnownOpt::IfMatch, |m| m.if_match.as_slice())
  }

  /// Set the If-Match option, 0 to 8 bytes
  pub fn set_if_match(&mut self, etag: &[u8]) -> Result<(), SetOptionError> {
    check_len(KnownOpt::IfMatch, etag.len())?;
    self.if_match = etag.iter().copied().collect();
    self.mark(KnownOpt::IfMatch, true);
    Ok(())
  }

  /// Whether If-None-Match is set
  pub fn if_none_match(&self) -> bool {
    self.present.contains(KnownOpt::IfNoneMatch)
  }

  /// Set or clear If-None-Match
  pub fn set_if_none_match(&mut self, set: bool) {
    self.mark(KnownOpt::IfNoneMatch, set);
  }

  /// Get the value of the Uri-Host option
  pub fn uri_host(&self) -> Option<&Segment<'a>> {
    self.get(KnownOpt::UriHost, |m| &m.uri_host)
  }

  /// Set the Uri-Host option
  pub fn set_uri_host(&mut self, host: &'a str) -> Result<(), SetOptionError> {
    check_len(KnownOpt::UriHost, host.len())?;
    self.uri_host = Segment::from(host);
    self.mark(KnownOpt::UriHost, true);
    Ok(())
  }

  /// Get the value of the Uri-Port option
  pub fn uri_port(&self) -> Option<u16> {
    self.get(KnownOpt::UriPort, |m| m.uri_port)
  }

  /// Set the Uri-Port option
  pub fn set_uri_port(&mut self, port: u16) {
    self.uri_port = port;
    self.mark(KnownOpt::UriPort, true);
  }

  /// Get the value of the Observe option
  pub fn observe(&self) -> Option<u32> {
    self.get(KnownOpt::Observe, |m| m.observe)
  }

  /// Set the Observe option, at most 24 bits
  pub fn set_observe(&mut self, seq: u32) -> Result<(), SetOptionError> {
    check_len(KnownOpt::Observe, int_len(seq))?;
    self.observe = seq;
    self.mark(KnownOpt::Observe, true);
    Ok(())
  }

  /// Get the value of the Block1 option
  pub fn block1(&self) -> Option<Block> {
    self.get(KnownOpt::Block1, |m| m.block1)
  }

  /// Set the Block1 option
  pub fn set_block1(&mut self, block: Block) -> Result<(), SetOptionError> {
    check_len(KnownOpt::Block1, int_len(block.into()))?;
    self.block1 = block;
    self.mark(KnownOpt::Block1, true);
    Ok(())
  }

  /// Get the value of the Block2 option
  pub fn block2(&self) -> Option<Block> {
    self.get(KnownOpt::Block2, |m| m.block2)
  }

  /// Set the Block2 option
  pub fn set_block2(&mut self, block: Block) -> Result<(), SetOptionError> {
    check_len(KnownOpt::Block2, int_len(block.into()))?;
    self.block2 = block;
    self.mark(KnownOpt::Block2, true);
    Ok(())
  }

  /// Get the value of the Size option
  pub fn size(&self) -> Option<u32> {
    self.get(KnownOpt::Size, |m| m.size)
  }

  /// Set the Size option
  pub fn set_size(&mut self, size: u32) {
    self.size = size;
    self.mark(KnownOpt::Size, true);
  }

  /// Get the values of the Accept option
  pub fn accept(&self) -> Option<&[u16]> {
    self.get(KnownOpt::Accept, |m| m.accept.as_slice())
  }

  /// Add a content type to the Accept option.
  ///
  /// ```
  /// use wren_msg::{code, Id, Message, SetOptionError, Type};
  ///
  /// let mut msg = Message::new(Type::Con, code::GET, Id(1));
  /// msg.add_accept(50).unwrap();
  /// msg.add_accept(40).unwrap();
  /// assert_eq!(msg.add_accept(0), Err(SetOptionError::AcceptListFull));
  /// assert_eq!(msg.accept(), Some([50u16, 40].as_ref()));
  /// ```
  pub fn add_accept(&mut self, ct: u16) -> Result<(), SetOptionError> {
    if self.accept.len() >= MAX_ACCEPT {
      return Err(SetOptionError::AcceptListFull);
    }

    self.accept.push(ct);
    self.mark(KnownOpt::Accept, true);
    Ok(())
  }

  /// Get the value of the Proxy-Uri option
  pub fn proxy_uri(&self) -> Option<&Segment<'a>> {
    self.get(KnownOpt::ProxyUri, |m| &m.proxy_uri)
  }

  /// Set the Proxy-Uri option
  pub fn set_proxy_uri(&mut self, uri: &'a str) -> Result<(), SetOptionError> {
    check_len(KnownOpt::ProxyUri, uri.len())?;
    self.proxy_uri = Segment::from(uri);
    self.mark(KnownOpt::ProxyUri, true);
    Ok(())
  }

  /// Uri-Path segments, empty if there are none
  pub fn uri_path(&self) -> &Segments<'a> {
    &self.uri_path
  }

  /// Uri-Query segments, empty if there are none
  pub fn uri_query(&self) -> &Segments<'a> {
    &self.uri_query
  }

  /// Location-Path segments, empty if there are none
  pub fn location_path(&self) -> &Segments<'a> {
    &self.location_path
  }

  /// Location-Query segments, empty if there are none
  pub fn location_query(&self) -> &Segments<'a> {
    &self.location_query
  }

  fn set_segments(&mut self,
                  opt: KnownOpt,
                  value: &'a str,
                  sep: u8)
                  -> Result<(), SetOptionError> {
    let segs = Segments::split(value.as_bytes(), sep);
    check_segments(opt, &segs)?;

    let present = !segs.is_empty();
    match opt {
      | KnownOpt::LocationPath => self.location_path = segs,
      | KnownOpt::UriPath => self.uri_path = segs,
      | KnownOpt::UriQuery => self.uri_query = segs,
      | _ => self.location_query = segs,
    }
    self.mark(opt, present);
    Ok(())
  }

  fn add_segment(&mut self, opt: KnownOpt, seg: &'a str) -> Result<(), SetOptionError> {
    check_len(opt, seg.len())?;
    match opt {
      | KnownOpt::LocationPath => self.location_path.push(seg),
      | KnownOpt::UriPath => self.uri_path.push(seg),
      | KnownOpt::UriQuery => self.uri_query.push(seg),
      | _ => self.location_query.push(seg),
    }
    self.mark(opt, true);
    Ok(())
  }

  /// Set Uri-Path from a `/`-separated path, replacing any existing segments.
  ///
  /// The string is split in place; segments borrow from `path`.
  ///
  /// ```
  /// use wren_msg::{code, Id, Message, Type};
  ///
  /// let mut msg = Message::new(Type::Con, code::GET, Id(1));
  /// msg.set_uri_path("/a/b/c").unwrap();
  /// assert_eq!(msg.uri_path().len(), 3);
  /// assert_eq!(msg.uri_path().join(b'/'), b"a/b/c".to_vec());
  /// ```
  pub fn set_uri_path(&mut self, path: &'a str) -> Result<(), SetOptionError> {
    self.set_segments(KnownOpt::UriPath, path, b'/')
  }

  /// Append one Uri-Path segment
  pub fn add_uri_path(&mut self, seg: &'a str) -> Result<(), SetOptionError> {
    self.add_segment(KnownOpt::UriPath, seg)
  }

  /// Set Uri-Query from a `&`-separated query string, replacing any existing segments
  pub fn set_uri_query(&mut self, query: &'a str) -> Result<(), SetOptionError> {
    self.set_segments(KnownOpt::UriQuery, query, b'&')
  }

  /// Append one Uri-Query segment
  pub fn add_uri_query(&mut self, seg: &'a str) -> Result<(), SetOptionError> {
    self.add_segment(KnownOpt::UriQuery, seg)
  }

  /// Set Location-Path from a `/`-separated path.
  ///
  /// Anything after a `?` is stored in Location-Query.
  ///
  /// ```
  /// use wren_msg::{code, Id, Message, Type};
  ///
  /// let mut msg = Message::new(Type::Ack, code::CREATED, Id(1));
  /// msg.set_location_path("things/12?rev=3").unwrap();
  /// assert_eq!(msg.location_path().join(b'/'), b"things/12".to_vec());
  /// assert_eq!(msg.location_query().join(b'&'), b"rev=3".to_vec());
  /// ```
  pub fn set_location_path(&mut self, path: &'a str) -> Result<(), SetOptionError> {
    match path.split_once('?') {
      | Some((path, query)) => {
        self.set_segments(KnownOpt::LocationPath, path, b'/')?;
        self.set_location_query(query)
      },
      | None => self.set_segments(KnownOpt::LocationPath, path, b'/'),
    }
  }

  /// Append one Location-Path segment
  pub fn add_location_path(&mut self, seg: &'a str) -> Result<(), SetOptionError> {
    self.add_segment(KnownOpt::LocationPath, seg)
  }

  /// Set Location-Query from a `&`-separated query string
  pub fn set_location_query(&mut self, query: &'a str) -> Result<(), SetOptionError> {
    self.set_segments(KnownOpt::LocationQuery, query, b'&')
  }

  /// Append one Location-Query segment
  pub fn add_location_query(&mut self, seg: &'a str) -> Result<(), SetOptionError> {
    self.add_segment(KnownOpt::LocationQuery, seg)
  }

  /// Find the value of `name` among the `name=value` pairs in Uri-Query
  ///
  /// ```
  /// use wren_msg::{code, Id, Message, Type};
  ///
  /// let mut msg = Message::new(Type::Con, code::GET, Id(1));
  /// msg.set_uri_query("unit=c&limit=10").unwrap();
  /// assert_eq!(msg.query_variable("limit"), Some(b"10".as_ref()));
  /// assert_eq!(msg.query_variable("page"), None);
  /// ```
  pub fn query_variable(&self, name: &str) -> Option<&[u8]> {
    find_var(self.uri_query.iter().map(Segment::as_bytes), name)
  }

  /// Find the value of `name` in a form-encoded (`a=1&b=2`) payload
  pub fn post_variable(&self, name: &str) -> Option<&[u8]> {
    self.payload()
        .and_then(|p| find_var(crate::msg::opt::segment::split(p, b'&'), name))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::code;

  fn msg() -> Message<'static> {
    Message::new(Type::Con, code::GET, Id(1))
  }

  #[test]
  fn getters_are_none_until_set() {
    let mut m = msg();
    assert_eq!(m.content_type(), None);
    assert_eq!(m.max_age(), None);
    assert_eq!(m.uri_port(), None);

    m.set_content_type(0);
    m.set_max_age(0);
    assert_eq!(m.content_type(), Some(0));
    assert_eq!(m.content_format(), Some(ContentFormat::Text));
    assert_eq!(m.max_age(), Some(0));

    m.remove(KnownOpt::MaxAge);
    assert_eq!(m.max_age(), None);
  }

  #[test]
  fn removed_options_leave_no_trace() {
    use crate::{TryFromBytes, TryIntoBytes};

    let mut m = msg();
    m.set_max_age(5);
    m.set_etag(&[1]).unwrap();
    m.set_observe(9).unwrap();
    m.set_uri_host("h").unwrap();
    m.set_proxy_uri("coap://p/").unwrap();
    m.set_block2(Block::new(3, true, 64).unwrap()).unwrap();
    m.set_size(1000);
    m.set_uri_path("a/b").unwrap();

    for opt in [KnownOpt::MaxAge,
                KnownOpt::ETag,
                KnownOpt::Observe,
                KnownOpt::UriHost,
                KnownOpt::ProxyUri,
                KnownOpt::Block2,
                KnownOpt::Size]
    {
      m.remove(opt);
    }

    let mut expected = msg();
    expected.set_uri_path("a/b").unwrap();
    assert_eq!(m, expected);

    let bytes = m.to_vec().unwrap();
    assert_eq!(Message::try_from_bytes(&bytes).unwrap(), m);
  }

  #[test]
  fn length_bounds() {
    let mut m = msg();
    assert_eq!(m.set_etag(&[]),
               Err(SetOptionError::ValueTooShort { number: OptNumber(4),
                                                   len: 0 }));
    assert_eq!(m.set_etag(&[0; 9]),
               Err(SetOptionError::ValueTooLong { number: OptNumber(4),
                                                  len: 9 }));
    assert_eq!(m.set_observe(0x0100_0000),
               Err(SetOptionError::ValueTooLong { number: OptNumber(6),
                                                  len: 4 }));
    assert_eq!(m.set_uri_host(""),
               Err(SetOptionError::ValueTooShort { number: OptNumber(3),
                                                   len: 0 }));
    assert_eq!(m.set_token(&[0; 9]), Err(SetOptionError::TokenTooLong(9)));
    assert!(m.options_present().is_empty());

    m.set_if_match(&[]).unwrap();
    assert_eq!(m.if_match(), Some(&[][..]));
  }

  #[test]
  fn segments_borrow_setter_argument() {
    let path = String::from("x/y");
    let mut m = Message::new(Type::Con, code::GET, Id(1));
    m.set_uri_path(&path).unwrap();
    assert!(m.uri_path().iter().all(Segment::is_borrowed));

    m.set_uri_path("").unwrap();
    assert!(!m.has(KnownOpt::UriPath));
  }

  #[test]
  fn post_variable() {
    let mut m = msg();
    m.set_payload(b"name=wren&weight=12");
    assert_eq!(m.post_variable("weight"), Some(b"12".as_ref()));
    assert_eq!(m.post_variable("wren"), None);
  }

  #[test]
  fn block_setter_rejects_wide_values() {
    let mut m = msg();
    assert_eq!(m.set_block2(Block::from(0x0100_0000)),
               Err(SetOptionError::ValueTooLong { number: OptNumber(23),
                                                  len: 4 }));
    m.set_block2(Block::new(5, true, 64).unwrap()).unwrap();
    assert_eq!(m.block2().map(|b| b.num()), Some(5));
  }
}
