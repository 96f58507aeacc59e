use no_std_net::SocketAddr;

/// Data that came from (or is going to) a network socket
#[derive(PartialEq, PartialOrd, Eq, Ord, Hash, Debug, Clone, Copy)]
pub struct Addrd<T>(pub T, pub SocketAddr);

impl<T> Addrd<T> {
  /// Borrow the contents of this Addressed
  pub fn as_ref(&self) -> Addrd<&T> {
    Addrd(self.data(), self.addr())
  }

  /// Map the data contained in this Addressed
  pub fn map<R>(self, f: impl FnOnce(T) -> R) -> Addrd<R> {
    Addrd(f(self.0), self.1)
  }

  /// Borrow the contents of the addressed item
  pub fn data(&self) -> &T {
    &self.0
  }

  /// Copy the socket address for the data
  pub fn addr(&self) -> SocketAddr {
    self.1
  }

  /// Turn the entire structure into something else
  pub fn fold<R>(self, f: impl FnOnce(T, SocketAddr) -> R) -> R {
    f(self.0, self.1)
  }
}

/// A datagram transport the [`Engine`](crate::engine::Engine) sends through.
///
/// This mirrors the Udp socket traits in embedded-nal, but allows us to implement them
/// for foreign types (like `std::net::UdpSocket`).
pub trait Socket {
  /// The error yielded by socket operations
  type Error: core::fmt::Debug;

  /// Per-transaction handle handed back to the socket on every send
  /// of that transaction (e.g. a DTLS session or radio channel).
  ///
  /// Sockets with no need for one use `()`.
  type Context;

  /// Send a datagram to a remote address
  fn send(&self, ctx: &Self::Context, msg: Addrd<&[u8]>) -> nb::Result<(), Self::Error>;

  /// Pull a buffered datagram from the socket, along with the address of the sender.
  ///
  /// It is expected that (like [`std::net::UdpSocket`]) if the message is larger
  /// than the buffer, those bytes are dropped and not considered an error condition.
  fn recv(&self, buffer: &mut [u8]) -> nb::Result<Addrd<usize>, Self::Error>;
}
