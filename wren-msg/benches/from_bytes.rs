use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

#[path = "bench_input.rs"]
mod bench_input;
use wren_msg::{Message, TryFromBytes};

fn message_from_bytes(c: &mut Criterion) {
  let mut group = c.benchmark_group("msg/from_bytes");
  group.measurement_time(std::time::Duration::from_secs(5));

  for inp in bench_input::inputs().iter() {
    let bytes = inp.get_bytes();

    group.bench_with_input(BenchmarkId::new("wren_msg/borrowed/size", bytes.len()),
                           &bytes,
                           |b, bytes| b.iter(|| Message::try_from_bytes(bytes).unwrap()));

    group.bench_with_input(BenchmarkId::new("wren_msg/owned/size", bytes.len()),
                           &bytes,
                           |b, bytes| {
                             b.iter(|| Message::try_from_bytes(bytes).unwrap().into_owned())
                           });
  }
  group.finish();
}

criterion_group!(benches, message_from_bytes);
criterion_main!(benches);
