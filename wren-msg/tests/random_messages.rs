use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wren_msg::*;

const CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789-._~";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Fate {
  Skip,
  Set,
  SetThenRemove,
}

/// Owns every value a message built from it will borrow
#[derive(Debug)]
struct Plan {
  fates: Vec<(KnownOpt, Fate)>,
  token: Vec<u8>,
  if_match: Vec<u8>,
  uri_host: String,
  etag: Vec<u8>,
  observe: u32,
  uri_port: u16,
  location_path: Vec<String>,
  uri_path: Vec<String>,
  content_type: u16,
  max_age: u32,
  uri_query: Vec<String>,
  accept: Vec<u16>,
  location_query: Vec<String>,
  block2: Block,
  block1: Block,
  size: u32,
  proxy_uri: String,
  payload: Option<Vec<u8>>,
}

fn bytes(rng: &mut ChaCha8Rng, len: core::ops::RangeInclusive<usize>) -> Vec<u8> {
  let len = rng.gen_range(len);
  (0..len).map(|_| rng.gen()).collect()
}

fn word(rng: &mut ChaCha8Rng, len: core::ops::RangeInclusive<usize>) -> String {
  let len = rng.gen_range(len);
  (0..len).map(|_| char::from(*CHARS.choose(rng).unwrap()))
          .collect()
}

fn words(rng: &mut ChaCha8Rng) -> Vec<String> {
  let n = rng.gen_range(1..=4);
  (0..n).map(|_| word(rng, 1..=20)).collect()
}

fn block(rng: &mut ChaCha8Rng) -> Block {
  let size = 16u16 << rng.gen_range(0..=6);
  Block::new(rng.gen_range(0..=Block::MAX_NUM), rng.gen(), size).unwrap()
}

/// For setters that cannot fail
fn ok(_: ()) -> Result<(), SetOptionError> {
  Ok(())
}

impl Plan {
  fn random(rng: &mut ChaCha8Rng) -> Self {
    let fates = KnownOpt::ALL.iter()
                             .map(|opt| {
                               let fate = match rng.gen_range(0..4) {
                                 | 0 => Fate::Skip,
                                 | 1 => Fate::SetThenRemove,
                                 | _ => Fate::Set,
                               };
                               (*opt, fate)
                             })
                             .collect();

    let accept = (0..rng.gen_range(1..=2)).map(|_| rng.gen()).collect();

    Self { fates,
           token: bytes(rng, 0..=8),
           if_match: bytes(rng, 0..=8),
           uri_host: word(rng, 1..=40),
           etag: bytes(rng, 1..=8),
           observe: rng.gen_range(0..=0xFF_FFFF),
           uri_port: rng.gen(),
           location_path: words(rng),
           uri_path: words(rng),
           content_type: rng.gen(),
           max_age: rng.gen(),
           uri_query: words(rng),
           accept,
           location_query: words(rng),
           block2: block(rng),
           block1: block(rng),
           size: rng.gen(),
           proxy_uri: format!("coap://{}/{}", word(rng, 1..=20), word(rng, 0..=60)),
           payload: Some(bytes(rng, 1..=64)).filter(|_| rng.gen()) }
  }

  fn set<'a>(&'a self, msg: &mut Message<'a>, opt: KnownOpt) -> Result<(), SetOptionError> {
    match opt {
      | KnownOpt::IfMatch => msg.set_if_match(&self.if_match),
      | KnownOpt::UriHost => msg.set_uri_host(&self.uri_host),
      | KnownOpt::ETag => msg.set_etag(&self.etag),
      | KnownOpt::IfNoneMatch => ok(msg.set_if_none_match(true)),
      | KnownOpt::Observe => msg.set_observe(self.observe),
      | KnownOpt::UriPort => ok(msg.set_uri_port(self.uri_port)),
      | KnownOpt::LocationPath => self.location_path
                                      .iter()
                                      .try_for_each(|s| msg.add_location_path(s)),
      | KnownOpt::UriPath => self.uri_path.iter().try_for_each(|s| msg.add_uri_path(s)),
      | KnownOpt::ContentType => ok(msg.set_content_type(self.content_type)),
      | KnownOpt::MaxAge => ok(msg.set_max_age(self.max_age)),
      | KnownOpt::UriQuery => self.uri_query.iter().try_for_each(|s| msg.add_uri_query(s)),
      | KnownOpt::Accept => self.accept.iter().try_for_each(|ct| msg.add_accept(*ct)),
      | KnownOpt::LocationQuery => self.location_query
                                       .iter()
                                       .try_for_each(|s| msg.add_location_query(s)),
      | KnownOpt::Block2 => msg.set_block2(self.block2),
      | KnownOpt::Block1 => msg.set_block1(self.block1),
      | KnownOpt::Size => ok(msg.set_size(self.size)),
      | KnownOpt::ProxyUri => msg.set_proxy_uri(&self.proxy_uri),
    }
  }

  /// Apply the plan's options in `order`.
  ///
  /// With `removals`, options fated to be removed are set and then removed;
  /// without, they are never touched.
  fn build<'a>(&'a self, order: &[(KnownOpt, Fate)], removals: bool) -> Message<'a> {
    let mut msg = Message::new(Type::Con, code::PUT, Id(0x1234));
    msg.set_token(&self.token).unwrap();

    for (opt, fate) in order {
      match fate {
        | Fate::Skip => (),
        | Fate::Set => self.set(&mut msg, *opt).unwrap(),
        | Fate::SetThenRemove if removals => {
          self.set(&mut msg, *opt).unwrap();
          msg.remove(*opt);
        },
        | Fate::SetThenRemove => (),
      }
    }

    if let Some(payload) = self.payload.as_ref() {
      msg.set_payload(payload);
    }

    msg
  }
}

#[test]
fn random_option_subsets_round_trip() {
  simple_logger::init_with_level(log::Level::Trace).ok();
  let mut rng = ChaCha8Rng::seed_from_u64(0x5EED);

  for _ in 0..500 {
    let plan = Plan::random(&mut rng);

    let mut order_a = plan.fates.clone();
    let mut order_b = plan.fates.clone();
    order_a.shuffle(&mut rng);
    order_b.shuffle(&mut rng);

    let a = plan.build(&order_a, true);
    let b = plan.build(&order_b, true);
    let untouched = plan.build(&plan.fates, false);

    assert_eq!(a, b, "{:?}", plan);
    assert_eq!(a, untouched, "{:?}", plan);

    let bytes = a.to_vec().unwrap();
    assert_eq!(bytes, b.to_vec().unwrap(), "{:?}", plan);
    assert_eq!(bytes.len(), a.get_size());

    let parsed = Message::try_from_bytes(&bytes).unwrap();
    assert_eq!(parsed, a, "{:?}", plan);
    assert_eq!(parsed.to_vec().unwrap(), bytes);

    let present = plan.fates
                      .iter()
                      .filter(|(_, fate)| *fate == Fate::Set)
                      .count();
    assert_eq!(parsed.options_present().len(), present);
  }
}
