use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

#[path = "bench_input.rs"]
mod bench_input;
use wren_msg::consts::MAX_DATAGRAM_SIZE;
use wren_msg::TryIntoBytes;

fn message_to_bytes(c: &mut Criterion) {
  let mut group = c.benchmark_group("msg/to_bytes");
  group.measurement_time(std::time::Duration::from_secs(5));

  for inp in bench_input::inputs().iter() {
    let (path, payload) = (inp.path(), inp.payload());
    let msg = inp.get_message(&path, &payload);

    group.bench_with_input(BenchmarkId::new("wren_msg/size", msg.get_size()),
                           &msg,
                           |b, msg| {
                             let mut buf = [0u8; MAX_DATAGRAM_SIZE];
                             b.iter(|| msg.try_into_bytes(&mut buf).unwrap())
                           });
  }
  group.finish();
}

criterion_group!(benches, message_to_bytes);
criterion_main!(benches);
