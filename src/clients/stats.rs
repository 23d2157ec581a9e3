use std::net::SocketAddr;
use std::time::Duration;
use std::time::Instant;
use std::time::SystemTime;

/// Information about a single query/response exchange with a server.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    /// When the request was sent.
    pub start: SystemTime,

    /// How long it took to get a response.
    pub duration: Duration,

    /// The server that answered.
    pub server: SocketAddr,

    pub request_size: usize,
    pub response_size: usize,
}

/// Builder class to aid in the construction of Stats objects.
#[cfg_attr(not(feature = "udp"), allow(dead_code))]
pub(crate) struct StatsBuilder {
    start: SystemTime,
    timer: Instant,
    request_size: usize,
}

#[cfg_attr(not(feature = "udp"), allow(dead_code))]
impl StatsBuilder {
    /// Call just before the request is sent, with the payload size.
    pub fn start(request_size: usize) -> StatsBuilder {
        StatsBuilder {
            start: SystemTime::now(),
            timer: Instant::now(),

            request_size,
        }
    }

    /// Call just after the response is received. Consumes the StatsBuilder and returns a Stats.
    pub fn end(self, server: SocketAddr, response_size: usize) -> Stats {
        Stats {
            start: self.start,
            duration: self.timer.elapsed(),

            request_size: self.request_size,

            server,
            response_size,
        }
    }
}
