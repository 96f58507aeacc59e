use core::fmt;

use embedded_time::Instant;
use no_std_net::SocketAddr;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std_alloc::vec::Vec;
use wren_msg::{Id, Message, MessageParseError, Token, TryFromBytes, Type};

mod error;
#[doc(inline)]
pub use error::*;

mod outcome;
#[doc(inline)]
pub use outcome::*;

mod transaction;
#[doc(inline)]
pub use transaction::*;

use crate::config::Config;
use crate::logging::Summary;
use crate::net::{Addrd, Socket};
use crate::retry::{RetryTimer, YouShould};
use crate::time::{self, Clock};

/// Something [`Engine::schedule`] decided for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Due {
  /// The transaction's wire bytes should be sent again
  Retransmit(Id),
  /// The transaction ran out of retransmissions. Its callback has been
  /// invoked with [`Outcome::Timeout`] and it has been removed.
  Abandoned(Id),
}

/// What became of a datagram handed to [`Engine::recv`]
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound<'a> {
  /// The datagram completed this transaction; its callback has run
  Matched(Id),
  /// The datagram matched no transaction (a request, a late duplicate,
  /// a response to something already cleared). The caller decides what to do with it.
  Unmatched(Addrd<Message<'a>>),
}

/// Owns in-flight outbound transactions and decides when to retransmit,
/// complete or abandon them.
///
/// The engine never reads a clock or touches a timer; every operation that
/// depends on time takes `now`, and the caller decides when to call
/// [`Engine::on_timer_tick`] (e.g. by sleeping until the earliest
/// [`Transaction::deadline`]).
///
/// `Ctx` is the per-transaction handle given to the [`Socket`] on every send,
/// and `Cb` is the completion callback.
///
/// ```
/// use embedded_time::Clock as _;
/// use wren::config::Config;
/// use wren::engine::{Engine, Outcome};
/// use wren_msg::{code, Id, Message, Type};
///
/// # let sock = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
/// # let server = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
/// # let peer = wren::std::net::to_no_std(server.local_addr().unwrap());
/// let clock = wren::std::Clock::new();
/// let mut engine = Engine::new(Config::default());
///
/// let id = engine.next_id().unwrap();
/// let token = engine.next_token(id, clock.try_now().unwrap());
///
/// let mut req = Message::new(Type::Con, code::GET, id);
/// req.token = token;
/// req.set_uri_path("sensors/temp").unwrap();
///
/// let on_complete = |id: Id, outcome: Outcome<'_>| println!("{} finished: {:?}", id, outcome);
/// engine.create(id, peer, (), on_complete)
///       .unwrap()
///       .set_message(&req)
///       .unwrap();
/// nb::block!(engine.send(id, clock.try_now().unwrap(), &sock)).unwrap();
///
/// assert_eq!(engine.get(id).unwrap().retransmissions(), 0);
/// assert!(engine.get(id).unwrap().deadline().is_some());
/// ```
pub struct Engine<C: Clock, Ctx, Cb> {
  config: Config,
  slots: Vec<Option<Transaction<C, Ctx, Cb>>>,
  next_id: u16,
  rng: Option<ChaCha8Rng>,
}

impl<C: Clock, Ctx, Cb> fmt::Debug for Engine<C, Ctx, Cb> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Engine")
     .field("config", &self.config)
     .field("transactions",
            &self.slots
                 .iter()
                 .flatten()
                 .map(|tx| tx.id.0)
                 .collect::<Vec<_>>())
     .field("next_id", &self.next_id)
     .finish()
  }
}

impl<C: Clock, Ctx, Cb: OnComplete> Engine<C, Ctx, Cb> {
  /// Create an engine with room for `config.max_transactions` transactions
  pub fn new(config: Config) -> Self {
    Self { slots: (0..config.max_transactions).map(|_| None).collect(),
           next_id: config.msg.id_seed,
           rng: None,
           config }
  }

  /// The engine's configuration
  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Number of live transactions
  pub fn len(&self) -> usize {
    self.slots.iter().flatten().count()
  }

  /// Whether there are no live transactions
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Borrow a live transaction
  pub fn get(&self, id: Id) -> Option<&Transaction<C, Ctx, Cb>> {
    self.slots.iter().flatten().find(|tx| tx.id == id)
  }

  /// Mutably borrow a live transaction
  pub fn get_mut(&mut self, id: Id) -> Option<&mut Transaction<C, Ctx, Cb>> {
    self.slots.iter_mut().flatten().find(|tx| tx.id == id)
  }

  /// Iterate over live transactions
  pub fn transactions(&self) -> impl Iterator<Item = &Transaction<C, Ctx, Cb>> {
    self.slots.iter().flatten()
  }

  /// The earliest instant at which [`Engine::on_timer_tick`] has something to do
  pub fn next_deadline(&self) -> Option<Instant<C>> {
    self.transactions().filter_map(Transaction::deadline).min()
  }

  fn slot_of(&mut self, id: Id) -> Option<&mut Option<Transaction<C, Ctx, Cb>>> {
    self.slots
        .iter_mut()
        .find(|slot| matches!(slot, Some(tx) if tx.id == id))
  }

  /// Allocate a message id not used by any live transaction.
  ///
  /// Ids are handed out by a wrapping counter starting at
  /// [`Msg::id_seed`](crate::config::Msg::id_seed).
  pub fn next_id(&mut self) -> Result<Id, Exhausted> {
    for _ in 0..=u16::MAX {
      let id = Id(self.next_id);
      self.next_id = self.next_id.wrapping_add(1);

      if self.get(id).is_none() {
        return Ok(id);
      }
    }

    Err(Exhausted::IdsExhausted)
  }

  /// Generate a token for the message `id`, mixing in
  /// [`Msg::token_seed`](crate::config::Msg::token_seed) and the time.
  pub fn next_token(&self, id: Id, now: Instant<C>) -> Token {
    let seed: [u8; 2] = self.config.msg.token_seed.to_be_bytes();
    let id: [u8; 2] = id.into();
    let now = time::millis_since_epoch(now).unwrap_or_default()
                                           .to_be_bytes();

    let mut bytes = [0u8; 12];
    bytes[0..2].copy_from_slice(&seed);
    bytes[2..4].copy_from_slice(&id);
    bytes[4..].copy_from_slice(&now);

    Token::opaque(&bytes)
  }

  /// Create a transaction for a message to `peer`.
  ///
  /// Set its message with [`Transaction::set_message`], then [`Engine::send`] it.
  pub fn create(&mut self,
                id: Id,
                peer: SocketAddr,
                context: Ctx,
                callback: Cb)
                -> Result<&mut Transaction<C, Ctx, Cb>, Exhausted> {
    if self.get(id).is_some() {
      return Err(Exhausted::IdInUse(id));
    }

    let slot = self.slots
                   .iter_mut()
                   .find(|slot| slot.is_none())
                   .ok_or(Exhausted::TableFull)?;

    log::debug!("transaction {} created for {}", id, peer);
    Ok(slot.insert(Transaction::new(id, peer, context, callback)))
  }

  /// Transmit a transaction's message.
  ///
  /// The first time a CON is sent, its retransmission timer starts with an
  /// interval drawn from [`Con::retry_strategy`](crate::config::Con::retry_strategy).
  ///
  /// Yields `WouldBlock` when the socket does; the transaction is unchanged and
  /// the send may be attempted again.
  pub fn send<S>(&mut self, id: Id, now: Instant<C>, sock: &S) -> nb::Result<(), Error<S::Error>>
    where S: Socket<Context = Ctx>
  {
    let seed = (u64::from(self.config.msg.token_seed) << 16)
               | u64::from(self.config.msg.id_seed);
    let con = self.config.msg.con;

    let tx = self.slots
                 .iter_mut()
                 .flatten()
                 .find(|tx| tx.id == id)
                 .ok_or(nb::Error::Other(Error::UnknownTransaction(id)))?;

    transmit(tx, sock)?;

    if tx.ty == Type::Con && tx.timer.is_none() {
      let rng = self.rng.get_or_insert_with(|| {
                          let entropy = time::millis_since_epoch(now).unwrap_or_default();
                          ChaCha8Rng::seed_from_u64(seed ^ entropy)
                        });
      tx.timer = Some(RetryTimer::new(now, con.retry_strategy, con.max_retransmit, rng));
    }

    tx.state = State::Sent;
    log::debug!("transaction {} sent {:?} to {}", id, tx.ty, tx.peer);
    Ok(())
  }

  /// Decide what is due at `now`.
  ///
  /// Transactions out of retransmissions are removed here, after their
  /// callback is invoked with [`Outcome::Timeout`]. Retransmissions are only
  /// reported; [`Engine::on_timer_tick`] is this plus sending them.
  pub fn schedule(&mut self, now: Instant<C>) -> Vec<Due> {
    let mut due = Vec::new();

    for slot in self.slots.iter_mut() {
      let (id, verdict) = match slot.as_mut() {
        | Some(tx) => match tx.timer.as_mut() {
          | Some(timer) => (tx.id, timer.what_should_i_do(now)),
          | None => continue,
        },
        | None => continue,
      };

      match verdict {
        | Ok(YouShould::Retry) => due.push(Due::Retransmit(id)),
        | Ok(YouShould::Cry) => {
          if let Some(tx) = slot.take() {
            log::warn!("transaction {} to {} abandoned after {} retransmissions",
                       id,
                       tx.peer,
                       tx.retransmissions());
            tx.complete(Outcome::Timeout);
          }
          due.push(Due::Abandoned(id));
        },
        | Err(nb::Error::WouldBlock) => (),
        | Err(nb::Error::Other(never)) => match never {},
      }
    }

    due
  }

  /// [`Engine::schedule`], then resend the wire bytes of every transaction due a retransmission.
  ///
  /// Yields everything [`Engine::schedule`] decided, along with the first transport error
  /// hit while resending (if any).
  ///
  /// A failed resend does not stop the others; each is logged.
  /// The retransmission still counts, so a transport that keeps failing ends in abandonment.
  pub fn on_timer_tick<S>(&mut self,
                          now: Instant<C>,
                          sock: &S)
                          -> (Vec<Due>, Option<Error<S::Error>>)
    where S: Socket<Context = Ctx>
  {
    let due = self.schedule(now);
    let mut first_err = None;

    for id in due.iter().filter_map(|d| match d {
                           | Due::Retransmit(id) => Some(*id),
                           | Due::Abandoned(_) => None,
                         })
    {
      let tx = match self.get(id) {
        | Some(tx) => tx,
        | None => continue,
      };

      log::debug!("transaction {} retransmission #{}", id, tx.retransmissions());
      match transmit(tx, sock) {
        | Ok(()) => (),
        | Err(e) => {
          log::warn!("transaction {} retransmission failed: {:?}", id, e);
          if let nb::Error::Other(e) = e {
            first_err.get_or_insert(e);
          }
        },
      }
    }

    (due, first_err)
  }

  /// Complete the transaction `id` with a response.
  ///
  /// Invokes its callback with [`Outcome::Response`] and removes it. Returns `false`
  /// (and does nothing) when no transaction has this id.
  pub fn match_and_complete(&mut self, id: Id, response: &Message<'_>) -> bool {
    match self.slot_of(id).and_then(Option::take) {
      | Some(tx) => {
        log::debug!("transaction {} completed by {}", id, Summary(response));
        tx.complete(Outcome::Response(response));
        true
      },
      | None => {
        log::trace!("no transaction for {}", Summary(response));
        false
      },
    }
  }

  /// Remove a transaction without invoking its callback.
  ///
  /// Returns whether there was one; clearing an unknown id is a no-op.
  pub fn clear(&mut self, id: Id) -> bool {
    let cleared = self.slot_of(id).and_then(Option::take).is_some();
    if cleared {
      log::debug!("transaction {} cleared", id);
    }
    cleared
  }

  /// Handle a datagram received from a peer.
  ///
  /// ACKs and RSTs complete the transaction with the same message id.
  /// Anything else (and ACKs/RSTs nobody is waiting for) is handed back.
  pub fn recv<'a>(&mut self, dgram: Addrd<&'a [u8]>) -> Result<Inbound<'a>, MessageParseError> {
    let Addrd(bytes, addr) = dgram;
    let msg = Message::try_from_bytes(bytes)?;

    match msg.ty {
      | Type::Ack | Type::Reset if self.match_and_complete(msg.id, &msg) => {
        Ok(Inbound::Matched(msg.id))
      },
      | _ => Ok(Inbound::Unmatched(Addrd(msg, addr))),
    }
  }

  /// Receive a datagram from `sock` into `buf` and [`Engine::recv`] it.
  pub fn poll<'b, S>(&mut self,
                     sock: &S,
                     buf: &'b mut [u8])
                     -> nb::Result<Inbound<'b>, Error<S::Error>>
    where S: Socket<Context = Ctx>
  {
    let Addrd(n, addr) = sock.recv(buf).map_err(|e| e.map(Error::Transport))?;
    let dgram: &'b [u8] = buf;

    self.recv(Addrd(&dgram[..n.min(dgram.len())], addr))
        .map_err(|e| nb::Error::Other(Error::Parse(e)))
  }
}

fn transmit<C, Ctx, Cb, S>(tx: &Transaction<C, Ctx, Cb>, sock: &S) -> nb::Result<(), Error<S::Error>>
  where C: Clock,
        S: Socket<Context = Ctx>
{
  if tx.wire.is_empty() {
    return Err(nb::Error::Other(Error::NothingToSend(tx.id)));
  }

  sock.send(&tx.context, Addrd(tx.wire.as_slice(), tx.peer))
      .map_err(|e| e.map(Error::Transport))
}
