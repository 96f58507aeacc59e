use core::ops::RangeInclusive;

use embedded_time::duration::Milliseconds;
use embedded_time::Instant;
use rand::Rng;

use crate::time::{Clock, Millis};

/// A non-blocking timer that allows a fixed-delay or exponential-backoff retry,
/// that lives alongside some operation to retry.
///
/// It does not _contain_ the work to be done (e.g. `Box<fn()>`); the
/// [`Engine`](crate::engine::Engine) keeps one next to each confirmable
/// transaction's wire bytes.
///
/// The timer counts from the last attempt, not from the first one,
/// so a late tick never causes a burst of retries.
///
/// ```
/// use embedded_time::clock::Clock;
/// use embedded_time::duration::Milliseconds;
/// use rand::SeedableRng;
/// use wren::retry;
///
/// let clock = wren::std::Clock::new();
/// let now = || clock.try_now().unwrap();
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
///
/// let strategy = retry::Strategy::Delay { min: Milliseconds(1),
///                                         max: Milliseconds(2) };
/// let mut retry = retry::RetryTimer::new(now(), strategy, retry::Attempts(2), &mut rng);
///
/// match nb::block!(retry.what_should_i_do(now())) {
///   | Ok(retry::YouShould::Retry) => (),
///   | Ok(retry::YouShould::Cry) => panic!("no more attempts!"),
///   | Err(never) => match never {},
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RetryTimer<C: Clock> {
  last: Instant<C>,
  interval: Millis,
  strategy: Strategy,
  attempts: Attempts,
  max_attempts: Attempts,
}

/// A number of attempts
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Attempts(pub u16);

/// Result of [`RetryTimer::what_should_i_do`].
///
/// This tells you if a retry should be attempted or not.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum YouShould {
  /// Attempts have been exhausted and the work that is
  /// being retried should be considered poisoned.
  Cry,
  /// A retry should be performed
  Retry,
}

impl<C: Clock> RetryTimer<C> {
  /// Create a new retrier, counting from the first attempt at `start`.
  ///
  /// When the strategy has jitter, the first interval is drawn from `rng`.
  pub fn new(start: Instant<C>,
             strategy: Strategy,
             max_attempts: Attempts,
             rng: &mut impl Rng)
             -> Self {
    let interval = if strategy.has_jitter() {
      Milliseconds(rng.gen_range(strategy.range()))
    } else {
      Milliseconds(*strategy.range().start())
    };

    Self { last: start,
           interval,
           strategy,
           attempts: Attempts(0),
           max_attempts }
  }

  /// When the next retry (or the verdict that there will be no more) is due.
  ///
  /// `None` if the deadline does not fit in the clock's range.
  pub fn deadline(&self) -> Option<Instant<C>> {
    self.last.checked_add(self.interval)
  }

  /// Number of retries granted so far
  pub fn attempts(&self) -> Attempts {
    self.attempts
  }

  /// Ask the timer whether the work should be attempted again.
  ///
  /// Returns `nb::Error::WouldBlock` when we have not yet
  /// waited the appropriate amount of time.
  ///
  /// Once due, yields [`YouShould::Retry`] until `max_attempts` retries have
  /// been granted, then [`YouShould::Cry`]. Each retry restarts the timer at `now`,
  /// doubling the interval for [`Strategy::Exponential`].
  pub fn what_should_i_do(&mut self,
                          now: Instant<C>)
                          -> nb::Result<YouShould, core::convert::Infallible> {
    match self.deadline() {
      | Some(deadline) if now >= deadline => (),
      | _ => return Err(nb::Error::WouldBlock),
    }

    if self.attempts >= self.max_attempts {
      return Ok(YouShould::Cry);
    }

    self.attempts.0 += 1;
    self.last = now;
    if let Strategy::Exponential { .. } = self.strategy {
      self.interval = Milliseconds(self.interval.0.saturating_mul(2));
    }

    Ok(YouShould::Retry)
  }
}

/// Strategy to employ when retrying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
  /// Generate a random delay between `min` and `max`,
  /// and wait until this delay has passed between attempts.
  ///
  /// After each failed attempt, double the delay before retrying again.
  Exponential {
    /// Minimum (inclusive) delay for second attempt
    init_min: Millis,
    /// Maximum (inclusive) delay for second attempt
    init_max: Millis,
  },
  /// Generate a random delay between `min` and `max`,
  /// and wait until this delay has passed between attempts.
  Delay {
    /// Minimum (inclusive) delay for attempts
    min: Millis,
    /// Maximum (inclusive) delay for attempts
    max: Millis,
  },
}

impl Strategy {
  /// Are min & max delays the same? if so, we should probably skip the random number generation.
  pub fn has_jitter(&self) -> bool {
    let rng = self.range();
    rng.start() != rng.end()
  }

  /// Get the min & max durations as an inclusive range
  pub fn range(&self) -> RangeInclusive<u64> {
    match self {
      | &Self::Delay { min: Milliseconds(min),
                       max: Milliseconds(max), } => (min..=max),

      | &Self::Exponential { init_min: Milliseconds(min),
                             init_max: Milliseconds(max), } => (min..=max),
    }
  }

  /// Longest time `attempts` back-to-back intervals may take
  ///
  /// ```
  /// use embedded_time::duration::Milliseconds;
  /// use wren::retry::{Attempts, Strategy};
  ///
  /// let exp = Strategy::Exponential { init_min: Milliseconds(2000),
  ///                                   init_max: Milliseconds(3000) };
  /// // 3s + 6s + 12s + 24s
  /// assert_eq!(exp.max_time(Attempts(4)), Milliseconds(45_000u64));
  /// ```
  pub fn max_time(&self, attempts: Attempts) -> Millis {
    Milliseconds(match self {
                   | Self::Exponential { init_max: Milliseconds(max),
                                         .. } => {
                     // max + 2max + 4max + ... = max * (2^n - 1)
                     max.saturating_mul(2u64.saturating_pow(attempts.0.into()) - 1)
                   },
                   | Self::Delay { max: Milliseconds(max),
                                   .. } => max.saturating_mul(attempts.0.into()),
                 })
  }
}
