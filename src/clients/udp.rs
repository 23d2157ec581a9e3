use crate::clients::stats::StatsBuilder;
use crate::clients::{Resolver, TransportFactory};
use crate::errors::{Error, Result};
use crate::Message;
use async_trait::async_trait;
use log::trace;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

pub const GOOGLE_IPV4_PRIMARY: &str = "8.8.8.8:53";
pub const GOOGLE_IPV4_SECONDARY: &str = "8.8.4.4:53";
pub const GOOGLE_IPV6_PRIMARY: &str = "[2001:4860:4860::8888]:53";
pub const GOOGLE_IPV6_SECONDARY: &str = "[2001:4860:4860::8844]:53";

pub const GOOGLE: [&str; 4] = [
    GOOGLE_IPV4_PRIMARY,
    GOOGLE_IPV4_SECONDARY,
    GOOGLE_IPV6_PRIMARY,
    GOOGLE_IPV6_SECONDARY,
];

/// The port DNS servers listen on.
pub const DNS_PORT: u16 = 53;

const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

// Size of the receive buffer.
const MAX_RESPONSE_SIZE: usize = 4096;

/// A UDP DNS Resolver, that sends each query to one server.
///
/// # Example
///
/// ```rust,no_run
/// use dnschase::clients::{Resolver, UdpResolver};
/// use dnschase::types::*;
/// use dnschase::CancellationToken;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), dnschase::Error> {
///     let mut query = Message::default();
///     query.add_question("bramp.net", Type::A, Class::Internet);
///
///     let resolver = UdpResolver {
///         read_timeout: Duration::from_secs(2),
///         ..UdpResolver::new("8.8.8.8:53".parse().unwrap())
///     };
///
///     let response = resolver.resolve(&query, &CancellationToken::new()).await?;
///     println!("{}", response);
///     Ok(())
/// }
/// ```
///
/// See <https://datatracker.ietf.org/doc/html/rfc1035#section-4.2.1>
#[derive(Clone, Debug)]
pub struct UdpResolver {
    pub server: SocketAddr,

    /// How long to wait for the response.
    pub read_timeout: Duration,
}

impl UdpResolver {
    /// Creates a new UdpResolver bound to the specific server.
    pub fn new(server: SocketAddr) -> Self {
        UdpResolver {
            server,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    async fn exchange(&self, req: &[u8]) -> Result<Message> {
        let local: SocketAddr = if self.server.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(local).await?;

        // Connect us to the server, meaning recv will only receive directly
        // from the server.
        socket.connect(self.server).await?;

        let stats = StatsBuilder::start(req.len());
        socket.send(req).await?;

        let mut buf = [0; MAX_RESPONSE_SIZE];
        let len = socket.recv(&mut buf).await?;
        trace!("received {} bytes from {}", len, self.server);

        let mut resp = Message::from_slice(&buf[0..len])?;
        resp.stats = Some(stats.end(self.server, len));

        Ok(resp)
    }
}

#[async_trait]
impl Resolver for UdpResolver {
    /// Sends the query [`Message`] to the `server` via UDP and returns the result.
    async fn resolve(&self, request: &Message, cancel: &CancellationToken) -> Result<Message> {
        let req = request.to_vec()?;
        trace!("sending {} bytes to {}", req.len(), self.server);

        tokio::select! {
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = tokio::time::timeout(self.read_timeout, self.exchange(&req)) => match result {
                Ok(resp) => resp,
                Err(_) => Err(Error::Timeout(self.read_timeout)),
            },
        }
    }
}

/// Creates a [`UdpResolver`] for each server it is asked for.
#[derive(Clone, Debug)]
pub struct UdpFactory {
    /// The port the servers are contacted on.
    pub port: u16,

    /// Passed on to each [`UdpResolver`].
    pub read_timeout: Duration,
}

impl Default for UdpFactory {
    fn default() -> Self {
        UdpFactory {
            port: DNS_PORT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl TransportFactory for UdpFactory {
    fn for_server(&self, server: IpAddr) -> Arc<dyn Resolver> {
        Arc::new(UdpResolver {
            server: SocketAddr::new(server, self.port),
            read_timeout: self.read_timeout,
        })
    }
}
