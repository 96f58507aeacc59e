use wren_msg::consts::MAX_CHUNK_SIZE;
use wren_msg::uri::Uri;
use wren_msg::{code, Block, Code, ContentFormat, Id, Message, SetOptionError, Token, Type};

/// Build a request message from a split URI
///
/// ```
/// use wren::req::ReqBuilder;
/// use wren_msg::{code, ContentFormat, Id, Token};
///
/// let mut uri = String::from("coap://Sensor.local:5700/rooms/kitchen?unit=c");
/// let uri = wren_msg::uri::split(&mut uri).unwrap();
///
/// let req = ReqBuilder::get(&uri).accept(ContentFormat::Json)
///                                .build(Id(1), Token::opaque(&[1]))
///                                .unwrap();
///
/// assert_eq!(req.code, code::GET);
/// assert_eq!(req.uri_host().map(|h| h.as_bytes()), Some(b"sensor.local".as_ref()));
/// assert_eq!(req.uri_port(), Some(5700));
/// assert_eq!(req.uri_path().join(b'/'), b"rooms/kitchen".to_vec());
/// assert_eq!(req.query_variable("unit"), Some(b"c".as_ref()));
/// ```
#[derive(Clone, Debug)]
pub struct ReqBuilder<'a> {
  inner: Result<Message<'a>, SetOptionError>,
}

impl<'a> ReqBuilder<'a> {
  fn new(code: Code, uri: &Uri<'a>) -> Self {
    let mut msg = Message::new(Type::Con, code, Id(0));
    let inner = Self::target(&mut msg, uri).map(|_| msg);
    Self { inner }
  }

  fn target(msg: &mut Message<'a>, uri: &Uri<'a>) -> Result<(), SetOptionError> {
    if let Some(host) = uri.host.filter(|_| !uri.is_ip_literal()) {
      msg.set_uri_host(host)?;
    }

    if !uri.is_default_port() {
      msg.set_uri_port(uri.port);
    }

    if !uri.path.is_empty() {
      msg.set_uri_path(uri.path)?;
    }

    match uri.query {
      | Some(query) if !query.is_empty() => msg.set_uri_query(query),
      | _ => Ok(()),
    }
  }

  fn with(mut self, f: impl FnOnce(&mut Message<'a>) -> Result<(), SetOptionError>) -> Self {
    if let Ok(msg) = self.inner.as_mut() {
      if let Err(e) = f(msg) {
        self.inner = Err(e);
      }
    }

    self
  }

  /// Creates a GET request
  pub fn get(uri: &Uri<'a>) -> Self {
    Self::new(code::GET, uri)
  }

  /// Creates a POST request
  pub fn post(uri: &Uri<'a>) -> Self {
    Self::new(code::POST, uri)
  }

  /// Creates a PUT request
  pub fn put(uri: &Uri<'a>) -> Self {
    Self::new(code::PUT, uri)
  }

  /// Creates a DELETE request
  pub fn delete(uri: &Uri<'a>) -> Self {
    Self::new(code::DELETE, uri)
  }

  /// Send as Confirmable (the default)
  pub fn con(self) -> Self {
    self.with(|m| {
          m.ty = Type::Con;
          Ok(())
        })
  }

  /// Send as Non-confirmable
  pub fn non(self) -> Self {
    self.with(|m| {
          m.ty = Type::Non;
          Ok(())
        })
  }

  /// Set the payload (truncated to [`MAX_CHUNK_SIZE`] bytes)
  pub fn payload(self, payload: &'a [u8]) -> Self {
    self.with(|m| {
          m.set_payload(payload);
          Ok(())
        })
  }

  /// Set the Content-Type of the payload
  pub fn content_format(self, format: ContentFormat) -> Self {
    self.with(|m| {
          m.set_content_format(format);
          Ok(())
        })
  }

  /// Add an acceptable response Content-Type
  ///
  /// # Errors
  /// Causes the builder to error when more than 2 are added.
  pub fn accept(self, format: ContentFormat) -> Self {
    self.with(|m| m.add_accept(format.into()))
  }

  /// Ask for block `num` of the response, in blocks of [`MAX_CHUNK_SIZE`] bytes
  ///
  /// # Errors
  /// Causes the builder to error when `num` does not fit in 20 bits.
  pub fn block2(self, num: u32) -> Self {
    // MAX_CHUNK_SIZE is a power of two within 16..=1024
    self.with(|m| m.set_block2(Block::new(num, false, MAX_CHUNK_SIZE as u16)?))
  }

  /// Unwrap the builder into the built request, with its message id & token
  pub fn build(self, id: Id, token: Token) -> Result<Message<'a>, SetOptionError> {
    self.inner.map(|mut msg| {
                msg.id = id;
                msg.token = token;
                msg
              })
  }
}
