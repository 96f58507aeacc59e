/// Content-Type
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentFormat {
  /// `text/plain; charset=utf-8`
  Text,
  /// `text/xml`
  TextXml,
  /// `text/csv`
  Csv,
  /// `text/html`
  Html,
  /// `image/gif`
  Gif,
  /// `image/jpeg`
  Jpeg,
  /// `image/png`
  Png,
  /// `image/tiff`
  Tiff,
  /// `audio/raw`
  AudioRaw,
  /// `video/raw`
  VideoRaw,
  /// `application/link-format`
  LinkFormat,
  /// `application/xml`
  Xml,
  /// `application/octet-stream`
  OctetStream,
  /// `application/rdf+xml`
  RdfXml,
  /// `application/soap+xml`
  SoapXml,
  /// `application/atom+xml`
  AtomXml,
  /// `application/xmpp+xml`
  XmppXml,
  /// `application/exi`
  Exi,
  /// `application/fastinfoset`
  FastInfoset,
  /// `application/soap+fastinfoset`
  SoapFastInfoset,
  /// `application/json`
  Json,
  /// `application/x-obix-binary`
  ObixBinary,
  /// Another content format
  Other(u16),
}

const TABLE: [(ContentFormat, u16); 22] = [(ContentFormat::Text, 0),
                                           (ContentFormat::TextXml, 1),
                                           (ContentFormat::Csv, 2),
                                           (ContentFormat::Html, 3),
                                           (ContentFormat::Gif, 21),
                                           (ContentFormat::Jpeg, 22),
                                           (ContentFormat::Png, 23),
                                           (ContentFormat::Tiff, 24),
                                           (ContentFormat::AudioRaw, 25),
                                           (ContentFormat::VideoRaw, 26),
                                           (ContentFormat::LinkFormat, 40),
                                           (ContentFormat::Xml, 41),
                                           (ContentFormat::OctetStream, 42),
                                           (ContentFormat::RdfXml, 43),
                                           (ContentFormat::SoapXml, 44),
                                           (ContentFormat::AtomXml, 45),
                                           (ContentFormat::XmppXml, 46),
                                           (ContentFormat::Exi, 47),
                                           (ContentFormat::FastInfoset, 48),
                                           (ContentFormat::SoapFastInfoset, 49),
                                           (ContentFormat::Json, 50),
                                           (ContentFormat::ObixBinary, 51)];

impl From<ContentFormat> for u16 {
  fn from(f: ContentFormat) -> Self {
    match f {
      | ContentFormat::Other(n) => n,
      | f => TABLE.iter()
                  .find(|(known, _)| *known == f)
                  .map(|(_, n)| *n)
                  .unwrap_or_default(),
    }
  }
}

impl From<u16> for ContentFormat {
  fn from(n: u16) -> Self {
    TABLE.iter()
         .find(|(_, known)| *known == n)
         .map(|(f, _)| *f)
         .unwrap_or(ContentFormat::Other(n))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn numbers() {
    assert_eq!(u16::from(ContentFormat::Json), 50);
    assert_eq!(u16::from(ContentFormat::LinkFormat), 40);
    assert_eq!(ContentFormat::from(0), ContentFormat::Text);
    assert_eq!(ContentFormat::from(1542), ContentFormat::Other(1542));
    assert_eq!(u16::from(ContentFormat::Other(1542)), 1542);
  }
}
