use crate::clients::{ParallelResolver, Resolver, TransportFactory};
use crate::errors::{Error, Result};
use crate::Message;
use async_trait::async_trait;
use log::debug;
use std::net::IpAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Resolves requests by following referrals.
///
/// The inner resolver is asked first. If the response has no answers, but
/// does list the addresses of other servers in its additional section, those
/// servers are raced with a [`ParallelResolver`] and the process repeats.
/// A response is final once it has answers, has no additional addresses, or
/// the request didn't ask for recursion (`rd` is false).
///
/// Only A and AAAA additional records are followed, anything else in the
/// additional section is ignored.
///
/// There is no limit on how many referrals are followed, unless one is set
/// with [`RecursiveResolver::with_max_hops`].
pub struct RecursiveResolver {
    inner: Arc<dyn Resolver>,
    transport: Arc<dyn TransportFactory>,
    max_hops: Option<usize>,
}

impl RecursiveResolver {
    /// Creates a RecursiveResolver starting at `inner`, and using `transport`
    /// to reach the servers named in referrals.
    pub fn new(inner: Arc<dyn Resolver>, transport: Arc<dyn TransportFactory>) -> Self {
        RecursiveResolver {
            inner,
            transport,
            max_hops: None,
        }
    }

    /// Like [`RecursiveResolver::new`] but fails with [`Error::MissingInner`]
    /// if there is no inner resolver.
    pub fn from_slot(
        inner: Option<Arc<dyn Resolver>>,
        transport: Arc<dyn TransportFactory>,
    ) -> Result<Self> {
        let inner = inner.ok_or(Error::MissingInner)?;
        Ok(RecursiveResolver::new(inner, transport))
    }

    /// Fail with [`Error::TooManyReferrals`] instead of following more than
    /// `max_hops` referrals.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = Some(max_hops);
        self
    }

    fn is_final(request: &Message, response: &Message) -> bool {
        !request.rd || !response.answers.is_empty() || response.additionals.is_empty()
    }

    /// The addresses of the next servers to ask.
    fn referral_servers(response: &Message) -> Vec<IpAddr> {
        response
            .additionals
            .iter()
            .filter_map(|record| {
                let ip = record.ip_addr();
                if ip.is_none() {
                    debug!("ignoring {} record '{}' in referral", record.r#type, record.name);
                }
                ip
            })
            .collect()
    }
}

cfg_feature! {
    #![feature = "udp"]

    impl RecursiveResolver {
        /// Creates a RecursiveResolver that follows referrals over UDP.
        pub fn udp(inner: Arc<dyn Resolver>) -> Self {
            RecursiveResolver::new(inner, Arc::new(crate::clients::UdpFactory::default()))
        }
    }
}

#[async_trait]
impl Resolver for RecursiveResolver {
    async fn resolve(&self, request: &Message, cancel: &CancellationToken) -> Result<Message> {
        let mut resolver = Arc::clone(&self.inner);
        let mut hops = 0;

        loop {
            let response = resolver.resolve(request, cancel).await?;
            if RecursiveResolver::is_final(request, &response) {
                return Ok(response);
            }

            let servers = RecursiveResolver::referral_servers(&response);
            if servers.is_empty() {
                debug!("referral has no usable addresses, returning it as is");
                return Ok(response);
            }

            if let Some(max_hops) = self.max_hops {
                if hops >= max_hops {
                    return Err(Error::TooManyReferrals(max_hops));
                }
            }
            hops += 1;

            debug!("following referral {} to {:?}", hops, servers);

            let next = servers
                .into_iter()
                .map(|server| self.transport.for_server(server))
                .collect();
            resolver = Arc::new(ParallelResolver::new(next)?);
        }
    }
}
