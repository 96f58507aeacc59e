#![allow(dead_code)]

use core::cell::{Cell, RefCell};

use embedded_time::rate::Fraction;
use embedded_time::Instant;
use std_alloc::collections::VecDeque;
use std_alloc::vec::Vec;

use crate::net::{Addrd, Socket};

/// A clock that only moves when told to, ticking in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockMock(pub Cell<u64>);

impl ClockMock {
  pub fn new() -> Self {
    Self(Cell::new(0))
  }

  /// Set the time, in milliseconds since the epoch
  pub fn set(&self, to: u64) {
    self.0.set(to);
  }
}

impl embedded_time::Clock for ClockMock {
  type T = u64;

  const SCALING_FACTOR: Fraction = Fraction::new(1, 1_000);

  fn try_now(&self) -> Result<Instant<Self>, embedded_time::clock::Error> {
    Ok(Instant::new(self.0.get()))
  }
}

/// A mocked socket
#[derive(Debug, Default)]
pub struct SockMock {
  /// Outbound datagrams. Address represents the destination
  tx: RefCell<Vec<Addrd<Vec<u8>>>>,
  /// Inbound datagrams. Address represents the sender
  rx: RefCell<VecDeque<Addrd<Vec<u8>>>>,
  fail: Cell<bool>,
}

impl SockMock {
  pub fn new() -> Self {
    Self::default()
  }

  /// Everything sent so far
  pub fn sent(&self) -> Vec<Addrd<Vec<u8>>> {
    self.tx.borrow().clone()
  }

  /// Make every send fail with `Other(())` until told otherwise
  pub fn fail_sends(&self, fail: bool) {
    self.fail.set(fail);
  }

  /// Queue a datagram to be received
  pub fn push_rx(&self, dgram: Addrd<Vec<u8>>) {
    self.rx.borrow_mut().push_back(dgram);
  }
}

impl Socket for SockMock {
  type Error = ();
  type Context = ();

  fn send(&self, _: &(), msg: Addrd<&[u8]>) -> nb::Result<(), Self::Error> {
    if self.fail.get() {
      return Err(nb::Error::Other(()));
    }

    self.tx.borrow_mut().push(msg.map(Vec::from));
    Ok(())
  }

  fn recv(&self, buf: &mut [u8]) -> nb::Result<Addrd<usize>, Self::Error> {
    let dgram = self.rx.borrow_mut().pop_front().ok_or(nb::Error::WouldBlock)?;
    let n = dgram.data().len().min(buf.len());
    buf[..n].copy_from_slice(&dgram.data()[..n]);

    Ok(dgram.map(|_| n))
  }
}
