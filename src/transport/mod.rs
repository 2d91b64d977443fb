use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use anyhow::{anyhow, Error};
use log::{debug, info};

/// Something that can deliver a datagram to the strip controller.
pub trait Transport {
    /// Point the transport at a new endpoint. Following sends go there.
    fn reset_endpoint(&mut self, address: &str, port: u16) -> Result<(), Error>;

    /// Send one datagram, returning the number of bytes written.
    fn send(&mut self, bytes: &[u8]) -> Result<usize, Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn reset_endpoint(&mut self, address: &str, port: u16) -> Result<(), Error> {
        (**self).reset_endpoint(address, port)
    }

    fn send(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        (**self).send(bytes)
    }
}

/// Fire-and-forget UDP sender.
pub struct UdpTransport {
    socket: UdpSocket,
    endpoint: Option<SocketAddr>,
}

impl UdpTransport {
    /// Bind an ephemeral local port. No endpoint is set yet.
    pub fn new() -> Result<Self, Error> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        debug!("UDP: bound to {}", socket.local_addr()?);

        Ok(UdpTransport {
            socket,
            endpoint: None,
        })
    }

    /// Bind and connect in one step.
    pub fn connect(address: &str, port: u16) -> Result<Self, Error> {
        let mut transport = UdpTransport::new()?;
        transport.reset_endpoint(address, port)?;
        Ok(transport)
    }

    pub fn endpoint(&self) -> Option<SocketAddr> {
        self.endpoint
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.socket.local_addr()?)
    }
}

impl Transport for UdpTransport {
    fn reset_endpoint(&mut self, address: &str, port: u16) -> Result<(), Error> {
        let endpoint = (address, port)
            .to_socket_addrs()
            .map_err(|e| anyhow!("invalid address {:?}: {}", address, e))?
            .next()
            .ok_or_else(|| anyhow!("{:?} did not resolve to any address", address))?;

        // The socket family has to match the endpoint
        let local = self.socket.local_addr()?;
        if local.is_ipv4() != endpoint.is_ipv4() {
            let unspecified: IpAddr = if endpoint.is_ipv4() {
                Ipv4Addr::UNSPECIFIED.into()
            } else {
                Ipv6Addr::UNSPECIFIED.into()
            };
            self.socket = UdpSocket::bind((unspecified, 0))?;
        }

        self.socket.connect(endpoint)?;
        self.endpoint = Some(endpoint);
        info!("UDP: sending frames to {}", endpoint);

        Ok(())
    }

    fn send(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        if self.endpoint.is_none() {
            return Err(anyhow!("no endpoint set"));
        }
        Ok(self.socket.send(bytes)?)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Keeps every datagram instead of sending it.
    #[derive(Default)]
    pub struct RecordingTransport {
        pub sent: Vec<Vec<u8>>,
        pub endpoint: Option<(String, u16)>,
        /// Send calls (counted from 0) that fail
        pub fail_on: Vec<usize>,
        pub calls: usize,
    }

    impl RecordingTransport {
        pub fn failing_on(calls: &[usize]) -> Self {
            RecordingTransport {
                fail_on: calls.to_vec(),
                ..Default::default()
            }
        }
    }

    impl Transport for RecordingTransport {
        fn reset_endpoint(&mut self, address: &str, port: u16) -> Result<(), Error> {
            self.endpoint = Some((address.to_string(), port));
            Ok(())
        }

        fn send(&mut self, bytes: &[u8]) -> Result<usize, Error> {
            let call = self.calls;
            self.calls += 1;
            if self.fail_on.contains(&call) {
                return Err(anyhow!("send {} refused", call));
            }
            self.sent.push(bytes.to_vec());
            Ok(bytes.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_udp_loopback() -> Result<(), Error> {
        let receiver = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0))?;
        let port = receiver.local_addr()?.port();

        let mut transport = UdpTransport::connect("127.0.0.1", port)?;
        assert_eq!(
            transport.endpoint(),
            Some(SocketAddr::new(Ipv4Addr::LOCALHOST.into(), port))
        );
        assert_eq!(transport.send(&[0x9C, 0xDA, 0x36])?, 3);

        let mut buf = [0u8; 16];
        let received = receiver.recv(&mut buf)?;
        assert_eq!(&buf[..received], &[0x9C, 0xDA, 0x36]);

        Ok(())
    }

    #[test]
    fn test_send_without_endpoint() -> Result<(), Error> {
        let mut transport = UdpTransport::new()?;
        assert!(transport.endpoint().is_none());
        assert!(transport.send(&[1, 2, 3]).is_err());
        Ok(())
    }

    #[test]
    fn test_invalid_address() -> Result<(), Error> {
        let mut transport = UdpTransport::new()?;
        assert!(transport.reset_endpoint("", 1234).is_err());
        assert!(transport.endpoint().is_none());
        Ok(())
    }

    fn point_and_send<T: Transport>(mut transport: T) -> Result<usize, Error> {
        transport.reset_endpoint("10.0.0.2", 4000)?;
        transport.send(&[1])
    }

    #[test]
    fn test_transport_by_reference() -> Result<(), Error> {
        let mut recorder = testing::RecordingTransport::default();
        assert_eq!(point_and_send(&mut recorder)?, 1);
        assert_eq!(recorder.endpoint, Some(("10.0.0.2".to_string(), 4000)));
        assert_eq!(recorder.sent, vec![vec![1]]);
        Ok(())
    }
}
