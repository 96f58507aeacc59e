use embedded_time::duration::Milliseconds;

use crate::retry::{Attempts, Strategy};
use crate::time::Millis;

/// Configuration options related to outbound CON requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Con {
  /// Retry strategy for CON requests that
  /// have not yet been ACKed.
  ///
  /// Defaults to an exponential retry strategy starting between
  /// `RESPONSE_TIMEOUT` (2s) and `RESPONSE_TIMEOUT * RANDOM_FACTOR` (3s):
  /// ```
  /// use embedded_time::duration::Milliseconds;
  /// use wren::config::Con;
  /// use wren::retry::Strategy;
  ///
  /// assert_eq!(Con::default().retry_strategy,
  ///            Strategy::Exponential { init_min: Milliseconds(2_000),
  ///                                    init_max: Milliseconds(3_000) });
  /// ```
  pub retry_strategy: Strategy,
  /// Number of times we are allowed to resend a CON request
  /// before giving up on it.
  ///
  /// Defaults to 4 retransmissions.
  /// ```
  /// use wren::config::Con;
  /// use wren::retry::Attempts;
  ///
  /// assert_eq!(Con::default().max_retransmit, Attempts(4));
  /// ```
  pub max_retransmit: Attempts,
}

/// Configuration options related to creating messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Msg {
  /// Seed used to generate message [`Token`](wren_msg::Token)s,
  /// customizable to allow for your application to generate tokens
  /// less guessably.
  ///
  /// The default value is 0, although it is
  /// best practice to set this to something else.
  /// (random integer, machine identifier)
  ///
  /// _e.g. if you're developing a swarm of
  /// smart CoAP-enabled thermostats, each one would ideally
  /// have a distinct token seed._
  ///
  /// ```
  /// use wren::config::Msg;
  ///
  /// assert_eq!(Msg::default().token_seed, 0);
  /// ```
  pub token_seed: u16,

  /// First message id handed out by
  /// [`Engine::next_id`](crate::engine::Engine::next_id).
  ///
  /// Like `token_seed`, devices sharing a network should not share this.
  ///
  /// ```
  /// use wren::config::Msg;
  ///
  /// assert_eq!(Msg::default().id_seed, 0);
  /// ```
  pub id_seed: u16,

  /// See [`Con`]
  pub con: Con,
}

impl Default for Con {
  fn default() -> Self {
    Con { retry_strategy: Strategy::Exponential { init_min: Milliseconds(2_000),
                                                  init_max: Milliseconds(3_000) },
          max_retransmit: Attempts(4) }
  }
}

impl Default for Msg {
  fn default() -> Self {
    Msg { token_seed: 0,
          id_seed: 0,
          con: Con::default() }
  }
}

/// Runtime config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
  /// See [`Msg`]
  pub msg: Msg,
  /// Maximum number of transactions that
  /// can be in flight at a given moment
  ///
  /// Default value is `8`
  ///
  /// ```
  /// use wren::config::Config;
  ///
  /// assert_eq!(Config::default().max_transactions, 8);
  /// ```
  pub max_transactions: usize,
}

impl Default for Config {
  fn default() -> Self {
    Config { msg: Msg::default(),
             max_transactions: 8 }
  }
}

impl Config {
  /// Longest time from the first transmission of a CON
  /// to its last retransmission.
  ///
  /// ```
  /// use embedded_time::duration::Milliseconds;
  /// use wren::config::Config;
  ///
  /// assert_eq!(Config::default().max_transmit_span(), Milliseconds(45_000u64));
  /// ```
  pub fn max_transmit_span(&self) -> Millis {
    self.msg.con.retry_strategy.max_time(self.msg.con.max_retransmit)
  }

  /// Longest time from the first transmission of a CON
  /// to the moment it is given up on.
  ///
  /// ```
  /// use embedded_time::duration::Milliseconds;
  /// use wren::config::Config;
  ///
  /// assert_eq!(Config::default().max_transmit_wait(), Milliseconds(93_000u64));
  /// ```
  pub fn max_transmit_wait(&self) -> Millis {
    let Attempts(max) = self.msg.con.max_retransmit;
    self.msg
        .con
        .retry_strategy
        .max_time(Attempts(max.saturating_add(1)))
  }
}
