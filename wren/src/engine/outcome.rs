use wren_msg::{Id, Message};

/// How a transaction ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome<'a> {
  /// An ACK or RST with the transaction's message id arrived
  Response(&'a Message<'a>),
  /// The transaction was retransmitted as many times as allowed
  /// without a response, and was abandoned
  Timeout,
}

/// Invoked exactly once per transaction, when it completes or is abandoned.
///
/// A transaction removed with [`Engine::clear`](super::Engine::clear) never
/// invokes its callback.
///
/// Implemented for closures:
/// ```
/// use wren::engine::{OnComplete, Outcome};
/// use wren_msg::Id;
///
/// let mut timeouts = 0;
/// let mut on_complete = |_: Id, outcome: Outcome<'_>| {
///   if outcome == Outcome::Timeout {
///     timeouts += 1;
///   }
/// };
///
/// on_complete.on_complete(Id(1), Outcome::Timeout);
/// drop(on_complete);
/// assert_eq!(timeouts, 1);
/// ```
pub trait OnComplete {
  /// The transaction `id` finished with `outcome`
  fn on_complete(&mut self, id: Id, outcome: Outcome<'_>);
}

impl<F> OnComplete for F where F: FnMut(Id, Outcome<'_>)
{
  fn on_complete(&mut self, id: Id, outcome: Outcome<'_>) {
    self(id, outcome)
  }
}

/// Callback for transactions whose outcome nobody waits on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ignore;

impl OnComplete for Ignore {
  fn on_complete(&mut self, id: Id, outcome: Outcome<'_>) {
    log::trace!("transaction {} finished unobserved: {:?}",
                id,
                match outcome {
                  | Outcome::Response(_) => "response",
                  | Outcome::Timeout => "timeout",
                });
  }
}
