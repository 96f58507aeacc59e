use core::fmt::Debug;

use wren_msg::{Id, MessageParseError, MessageToBytesError};

/// Why a transaction could not be created
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exhausted {
  /// A live transaction already uses this message id
  #[error("message id {0} is already in flight")]
  IdInUse(Id),
  /// Every transaction slot is occupied
  #[error("transaction table is full")]
  TableFull,
  /// All 65536 message ids are in flight
  #[error("no free message ids")]
  IdsExhausted,
}

/// An error encounterable from within the [`Engine`](super::Engine)
///
/// `E` is the transport's error type.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E: Debug> {
  /// Out of transaction slots or message ids
  #[error(transparent)]
  ResourceExhausted(#[from] Exhausted),
  /// The socket failed to send or receive
  #[error("transport error: {0:?}")]
  Transport(E),
  /// Serializing a message to bytes failed
  #[error(transparent)]
  ToBytes(#[from] MessageToBytesError),
  /// Parsing a received datagram failed
  #[error(transparent)]
  Parse(#[from] MessageParseError),
  /// No live transaction has this id
  #[error("no transaction with id {0}")]
  UnknownTransaction(Id),
  /// The transaction has no message to send yet
  #[error("transaction {0} has no message set")]
  NothingToSend(Id),
}
