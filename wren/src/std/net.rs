use std::io;
use std::net::UdpSocket;

use crate::net::{Addrd, Socket};

/// Convert a [`std::net::SocketAddr`] to the `no_std` address type used by [`Addrd`]
pub fn to_no_std(addr: std::net::SocketAddr) -> no_std_net::SocketAddr {
  use no_std_net::{Ipv4Addr, Ipv6Addr, SocketAddrV4, SocketAddrV6};

  match addr {
    | std::net::SocketAddr::V4(v4) => {
      let [a, b, c, d] = v4.ip().octets();
      SocketAddrV4::new(Ipv4Addr::new(a, b, c, d), v4.port()).into()
    },
    | std::net::SocketAddr::V6(v6) => {
      let [a, b, c, d, e, f, g, h] = v6.ip().segments();
      SocketAddrV6::new(Ipv6Addr::new(a, b, c, d, e, f, g, h),
                        v6.port(),
                        v6.flowinfo(),
                        v6.scope_id()).into()
    },
  }
}

/// Convert a `no_std` address back to a [`std::net::SocketAddr`]
pub fn to_std(addr: no_std_net::SocketAddr) -> std::net::SocketAddr {
  use std::net::{Ipv4Addr, Ipv6Addr, SocketAddrV4, SocketAddrV6};

  match addr {
    | no_std_net::SocketAddr::V4(v4) => {
      let [a, b, c, d] = v4.ip().octets();
      SocketAddrV4::new(Ipv4Addr::new(a, b, c, d), v4.port()).into()
    },
    | no_std_net::SocketAddr::V6(v6) => {
      let [a, b, c, d, e, f, g, h] = v6.ip().segments();
      SocketAddrV6::new(Ipv6Addr::new(a, b, c, d, e, f, g, h),
                        v6.port(),
                        v6.flowinfo(),
                        v6.scope_id()).into()
    },
  }
}

pub(crate) fn io_to_nb(err: io::Error) -> nb::Error<io::Error> {
  match err.kind() {
    | io::ErrorKind::WouldBlock => nb::Error::WouldBlock,
    | _ => nb::Error::Other(err),
  }
}

/// Blocking or not depending on [`UdpSocket::set_nonblocking`]
impl Socket for UdpSocket {
  type Error = io::Error;
  type Context = ();

  fn send(&self, _: &(), msg: Addrd<&[u8]>) -> nb::Result<(), Self::Error> {
    self.send_to(msg.data(), to_std(msg.addr()))
        .map(|_| ())
        .map_err(io_to_nb)
  }

  fn recv(&self, buffer: &mut [u8]) -> nb::Result<Addrd<usize>, Self::Error> {
    self.recv_from(buffer)
        .map(|(n, addr)| Addrd(n, to_no_std(addr)))
        .map_err(io_to_nb)
  }
}
