use crate::consts::{DEFAULT_PORT, DEFAULT_SECURE_PORT};

/// A `coap://` URI, split into views of the string it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uri<'a> {
  /// Whether the scheme was `coaps`
  pub secure: bool,
  /// Host name or IP literal (IPv6 literals keep their brackets), lower-cased.
  ///
  /// `None` when the URI was only a path.
  pub host: Option<&'a str>,
  /// Port, defaulted by scheme when absent
  pub port: u16,
  /// Path, without the leading `/`
  pub path: &'a str,
  /// Query, without the leading `?`
  pub query: Option<&'a str>,
}

impl<'a> Uri<'a> {
  /// Whether [`Uri::host`] is an IPv4 or bracketed IPv6 literal
  pub fn is_ip_literal(&self) -> bool {
    self.host
        .map(|h| h.starts_with('[') || h.parse::<core::net::Ipv4Addr>().is_ok())
        .unwrap_or(false)
  }

  /// Whether [`Uri::port`] is the default port for the scheme
  pub fn is_default_port(&self) -> bool {
    self.port == Self::default_port(self.secure)
  }

  fn default_port(secure: bool) -> u16 {
    if secure {
      DEFAULT_SECURE_PORT
    } else {
      DEFAULT_PORT
    }
  }
}

/// Errors encounterable while splitting a URI
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, PartialOrd, Eq, Ord)]
pub enum UriError {
  /// The URI could not be understood starting at this byte index
  #[error("malformed uri at byte {at}")]
  Malformed {
    /// Index of the offending position
    at: usize,
  },
}

fn malformed(at: usize) -> UriError {
  UriError::Malformed { at }
}

/// Split a URI into host, port, path and query.
///
/// The host is lower-cased in place; the returned [`Uri`] borrows `uri` and copies nothing.
///
/// ```
/// use wren_msg::uri::{self, Uri};
///
/// let mut s = String::from("coap://Example.COM:61616/sensors/temp?unit=c");
/// let uri = uri::split(&mut s).unwrap();
///
/// assert_eq!(uri,
///            Uri { secure: false,
///                  host: Some("example.com"),
///                  port: 61616,
///                  path: "sensors/temp",
///                  query: Some("unit=c") });
/// ```
pub fn split(uri: &mut str) -> Result<Uri<'_>, UriError> {
  let (secure, host_start) = if uri.starts_with('/') {
    (false, None)
  } else if uri.get(..8).map_or(false, |s| s.eq_ignore_ascii_case("coaps://")) {
    (true, Some(8))
  } else if uri.get(..7).map_or(false, |s| s.eq_ignore_ascii_case("coap://")) {
    (false, Some(7))
  } else {
    return Err(malformed(0));
  };

  let bytes = uri.as_bytes();
  let len = bytes.len();

  let (host, rest_start) = match host_start {
    | None => (None, 0),
    | Some(start) if bytes.get(start) == Some(&b'[') => {
      let close = bytes[start..].iter()
                                .position(|b| *b == b']')
                                .ok_or(malformed(len))?;
      (Some(start..start + close + 1), start + close + 1)
    },
    | Some(start) => {
      let end = bytes[start..].iter()
                              .position(|b| matches!(b, b':' | b'/' | b'?'))
                              .map(|n| start + n)
                              .unwrap_or(len);
      if end == start {
        return Err(malformed(start));
      }
      (Some(start..end), end)
    },
  };

  let mut at = rest_start;
  let mut port = Uri::default_port(secure);

  if host.is_some() && bytes.get(at) == Some(&b':') {
    at += 1;
    let digits = bytes[at..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits > 0 {
      port = uri[at..at + digits].parse().map_err(|_| malformed(at))?;
    }
    at += digits;
  }

  let (path, query) = match bytes.get(at) {
    | None => (at..at, None),
    | Some(b'/') | Some(b'?') => {
      let q = bytes[at..].iter().position(|b| *b == b'?').map(|n| at + n);
      let path_start = if bytes[at] == b'/' { at + 1 } else { at };
      match q {
        | Some(q) => (path_start..q, Some(q + 1..len)),
        | None => (path_start..len, None),
      }
    },
    | Some(_) => return Err(malformed(at)),
  };

  if let Some(host) = host.clone() {
    uri[host].make_ascii_lowercase();
  }

  let uri: &str = uri;
  Ok(Uri { secure,
           host: host.map(|h| &uri[h]),
           port,
           path: &uri[path],
           query: query.map(|q| &uri[q]) })
}
