use core::fmt;

use embedded_time::Instant;
use no_std_net::SocketAddr;
use tinyvec::ArrayVec;
use wren_msg::consts::MAX_PACKET_SIZE;
use wren_msg::{Id, Message, MessageToBytesError, TryIntoBytes, Type};

use super::{OnComplete, Outcome};
use crate::retry::{Attempts, RetryTimer};
use crate::time::{self, Clock};

/// Where a transaction is in its lifecycle.
///
/// Completed & abandoned transactions are removed from the engine,
/// so they have no state of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum State {
  /// Created, not yet transmitted
  Created,
  /// Transmitted at least once, awaiting a response
  Sent,
}

/// An outbound message and everything needed to see it to completion.
///
/// The message is serialized once, when it is set; retransmissions send the
/// exact same bytes.
pub struct Transaction<C: Clock, Ctx, Cb> {
  pub(super) id: Id,
  pub(super) peer: SocketAddr,
  pub(super) ty: Type,
  pub(super) state: State,
  pub(super) wire: ArrayVec<[u8; MAX_PACKET_SIZE]>,
  pub(super) timer: Option<RetryTimer<C>>,
  pub(super) context: Ctx,
  pub(super) callback: Cb,
}

impl<C: Clock, Ctx, Cb: OnComplete> Transaction<C, Ctx, Cb> {
  pub(super) fn new(id: Id, peer: SocketAddr, context: Ctx, callback: Cb) -> Self {
    Self { id,
           peer,
           ty: Type::Con,
           state: State::Created,
           wire: ArrayVec::new(),
           timer: None,
           context,
           callback }
  }

  /// Serialize `msg` into this transaction's wire buffer.
  ///
  /// The message id on the wire is always the transaction's, whatever `msg.id` says.
  /// Messages that do not fit in [`MAX_PACKET_SIZE`] bytes are rejected.
  pub fn set_message(&mut self, msg: &Message<'_>) -> Result<(), MessageToBytesError> {
    let mut buf = [0u8; MAX_PACKET_SIZE];
    let len = msg.try_into_bytes(&mut buf)?;

    let id: [u8; 2] = self.id.into();
    buf[2..4].copy_from_slice(&id);

    self.wire = ArrayVec::from_array_len(buf, len);
    self.ty = msg.ty;
    Ok(())
  }

  /// The message id
  pub fn id(&self) -> Id {
    self.id
  }

  /// Who the message is for
  pub fn peer(&self) -> SocketAddr {
    self.peer
  }

  /// Type of the message set with [`Transaction::set_message`]
  pub fn ty(&self) -> Type {
    self.ty
  }

  /// Lifecycle state
  pub fn state(&self) -> State {
    self.state
  }

  /// The serialized message, empty until [`Transaction::set_message`]
  pub fn wire(&self) -> &[u8] {
    &self.wire
  }

  /// Number of times the message has been sent again after the first transmission
  pub fn retransmissions(&self) -> u16 {
    self.timer
        .as_ref()
        .map(|t| t.attempts())
        .unwrap_or(Attempts(0))
        .0
  }

  /// Instant of the next retransmission (or of abandonment, once retransmissions
  /// are exhausted).
  ///
  /// `None` for transactions that are never retransmitted (anything but CON) or
  /// that have not been sent yet.
  pub fn deadline(&self) -> Option<Instant<C>> {
    self.timer.as_ref().and_then(RetryTimer::deadline)
  }

  /// The collaborator handle given when the transaction was created
  pub fn context(&self) -> &Ctx {
    &self.context
  }

  /// Mutably borrow the collaborator handle
  pub fn context_mut(&mut self) -> &mut Ctx {
    &mut self.context
  }

  pub(super) fn complete(mut self, outcome: Outcome<'_>) {
    self.callback.on_complete(self.id, outcome);
  }
}

impl<C: Clock, Ctx, Cb> fmt::Debug for Transaction<C, Ctx, Cb> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Transaction")
     .field("id", &self.id)
     .field("peer", &self.peer)
     .field("ty", &self.ty)
     .field("state", &self.state)
     .field("wire_len", &self.wire.len())
     .field("retransmissions",
            &self.timer.as_ref().map(|t| t.attempts().0).unwrap_or(0))
     .field("deadline_ms",
            &self.timer
                 .as_ref()
                 .and_then(RetryTimer::deadline)
                 .and_then(time::millis_since_epoch))
     .finish()
  }
}
