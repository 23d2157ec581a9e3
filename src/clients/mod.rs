//! Resolvers, and the combinators that build new resolvers out of them.
//!
//! Everything here speaks [`Resolver`]. A [`UdpResolver`] asks one server,
//! a [`ParallelResolver`] races many resolvers, and a
//! [`RecursiveResolver`] follows referrals by racing the servers each
//! referral names. The [`Client`] turns names into queries on top.

use crate::errors::Result;
use crate::Message;
use async_trait::async_trait;
use std::net::IpAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub use self::client::Client;
pub use self::parallel::ParallelResolver;
pub use self::recursive::RecursiveResolver;
pub use self::stats::Stats;

mod client;
mod parallel;
mod recursive;
mod stats;

cfg_feature! {
    #![feature = "udp"]

    pub mod udp;

    pub use self::udp::UdpFactory;
    pub use self::udp::UdpResolver;
}

/// Resolver takes a request and asynchronously returns a response.
///
/// Implementations should return promptly with [`Error::Cancelled`] once
/// `cancel` is triggered.
///
/// [`Error::Cancelled`]: crate::Error::Cancelled
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, request: &Message, cancel: &CancellationToken) -> Result<Message>;
}

/// Builds a resolver that asks one particular server.
///
/// This must be cheap, no I/O is expected until the returned resolver is used.
pub trait TransportFactory: Send + Sync {
    fn for_server(&self, server: IpAddr) -> Arc<dyn Resolver>;
}

impl<F> TransportFactory for F
where
    F: Fn(IpAddr) -> Arc<dyn Resolver> + Send + Sync,
{
    fn for_server(&self, server: IpAddr) -> Arc<dyn Resolver> {
        self(server)
    }
}
