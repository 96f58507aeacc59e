use wren_msg::*;

#[derive(Debug, PartialEq, PartialOrd, Ord, Eq)]
pub struct TestInput {
  pub tkl: u8,
  pub n_segments: usize,
  pub segment_size: usize,
  pub payload_size: usize,
}

impl TestInput {
  pub fn path(&self) -> String {
    let seg = "a".repeat(self.segment_size);
    vec![seg; self.n_segments].join("/")
  }

  pub fn payload(&self) -> Vec<u8> {
    core::iter::repeat(1u8).take(self.payload_size).collect()
  }

  pub fn get_message<'a>(&self, path: &'a str, payload: &'a [u8]) -> Message<'a> {
    let token = core::iter::repeat(1u8).take(self.tkl as _)
                                       .collect::<Vec<_>>();

    let mut msg = Message::new(Type::Non, code::CONTENT, Id(1));
    msg.set_token(&token).unwrap();
    msg.set_uri_path(path).unwrap();
    msg.set_content_format(ContentFormat::Json);
    msg.set_payload(payload);
    msg
  }

  pub fn get_bytes(&self) -> Vec<u8> {
    let (path, payload) = (self.path(), self.payload());
    self.get_message(&path, &payload).to_vec().unwrap()
  }
}

pub fn inputs() -> Vec<TestInput> {
  vec![TestInput { tkl: 0,
                   n_segments: 0,
                   segment_size: 0,
                   payload_size: 0 },
       TestInput { tkl: 4,
                   n_segments: 2,
                   segment_size: 8,
                   payload_size: 16 },
       TestInput { tkl: 4,
                   n_segments: 4,
                   segment_size: 16,
                   payload_size: 32 },
       TestInput { tkl: 8,
                   n_segments: 8,
                   segment_size: 16,
                   payload_size: 64 },
       TestInput { tkl: 8,
                   n_segments: 4,
                   segment_size: 64,
                   payload_size: 128 },]
}
