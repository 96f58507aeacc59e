use embedded_time::Instant;

/// A duration, in milliseconds
pub type Millis = embedded_time::duration::Milliseconds<u64>;

/// Supertrait of [`embedded_time::Clock`] pinning the
/// type of "ticks" to u64
pub trait Clock: embedded_time::Clock<T = u64> {}
impl<C: embedded_time::Clock<T = u64>> Clock for C {}

/// Milliseconds since the clock's epoch, `None` if the conversion overflows
pub fn millis_since_epoch<C: Clock>(instant: Instant<C>) -> Option<u64> {
  Millis::try_from(instant.duration_since_epoch()).ok()
                                                   .map(|ms| ms.0)
}
