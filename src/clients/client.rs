use crate::clients::Resolver;
use crate::errors::{Error, Result};
use crate::types::*;
use crate::Message;
use log::debug;
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A high level DNS client, answering questions such as "what are the
/// addresses of this host?" using any [`Resolver`].
///
/// # Example
///
/// ```rust,no_run
/// use dnschase::clients::{Client, ParallelResolver, RecursiveResolver, UdpResolver};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), dnschase::Error> {
///     // Start at a.root-servers.net, and follow referrals from there.
///     let root = UdpResolver::new("198.41.0.4:53".parse().unwrap());
///     let client = Client::new(Arc::new(RecursiveResolver::udp(Arc::new(root))));
///
///     for ip in client.lookup("bramp.net").await? {
///         println!("{}", ip);
///     }
///     Ok(())
/// }
/// ```
pub struct Client {
    resolver: Arc<dyn Resolver>,
}

impl Client {
    pub fn new(resolver: Arc<dyn Resolver>) -> Client {
        Client { resolver }
    }

    fn query(name: &str, r#type: Type) -> Message {
        let mut query = Message {
            id: rand::random(),
            rd: true,

            ..Default::default()
        };
        query.add_question(name, r#type, Class::Internet);
        query
    }

    /// Resolves a single question, failing with [`Error::Response`] if the
    /// final response code is not [`Rcode::NoError`].
    pub async fn resolve(&self, name: &str, r#type: Type) -> Result<Message> {
        let query = Client::query(name, r#type);
        let response = self
            .resolver
            .resolve(&query, &CancellationToken::new())
            .await?;

        debug!(
            "{} {}: got {} with {} answers",
            name,
            r#type,
            response.rcode,
            response.answers.len()
        );

        match response.rcode {
            Rcode::NoError => Ok(response),
            rcode => Err(Error::Response(rcode)),
        }
    }

    /// Resolves a name into one or more IP address.
    ///
    /// A and AAAA queries are sent at the same time, and their answers merged.
    ///
    /// See [rfc1035#section-7] and [rfc1034#section-5].
    ///
    /// [rfc1035#section-7]: https://datatracker.ietf.org/doc/html/rfc1035#section-7
    /// [rfc1034#section-5]: https://datatracker.ietf.org/doc/html/rfc1034#section-5
    pub async fn lookup(&self, name: &str) -> Result<Vec<IpAddr>> {
        let (a, aaaa) = tokio::join!(self.resolve(name, Type::A), self.resolve(name, Type::AAAA));

        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for response in [a?, aaaa?].iter() {
            for answer in &response.answers {
                // CNAMEs and other records are ignored.
                if let Some(ip) = answer.ip_addr() {
                    if seen.insert(ip) {
                        results.push(ip);
                    }
                }
            }
        }

        if results.is_empty() {
            return Err(Error::NoRecords(name.to_string()));
        }

        Ok(results)
    }

    /// Resolves a IP address into a name, with a PTR query.
    pub async fn reverse(&self, ip: IpAddr) -> Result<String> {
        let name = reverse_name(ip);
        let response = self.resolve(&name, Type::PTR).await?;

        response
            .answers
            .into_iter()
            .find_map(|answer| match answer.resource {
                Resource::PTR(domain) => Some(domain),
                _ => None,
            })
            .ok_or(Error::NoRecords(name))
    }
}

cfg_feature! {
    #![feature = "udp"]

    impl Client {
        /// Creates a Client that races Google's public DNS servers.
        pub fn google() -> Result<Client> {
            use crate::clients::{ParallelResolver, UdpResolver};
            use crate::clients::udp::GOOGLE;

            let resolvers = GOOGLE
                .iter()
                .filter_map(|s| s.parse().ok())
                .map(|server| Arc::new(UdpResolver::new(server)) as Arc<dyn Resolver>)
                .collect();

            Ok(Client::new(Arc::new(ParallelResolver::new(resolvers)?)))
        }
    }
}

/// Returns the in-addr.arpa or ip6.arpa name used to reverse lookup `ip`.
///
/// See [rfc1035#section-3.5] and [rfc3596#section-2.5].
///
/// [rfc1035#section-3.5]: https://datatracker.ietf.org/doc/html/rfc1035#section-3.5
/// [rfc3596#section-2.5]: https://datatracker.ietf.org/doc/html/rfc3596#section-2.5
pub(crate) fn reverse_name(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(ip4) => {
            let o = ip4.octets();
            format!("{}.{}.{}.{}.in-addr.arpa.", o[3], o[2], o[1], o[0])
        }
        IpAddr::V6(ip6) => {
            let mut name = String::with_capacity(72);
            for b in ip6.octets().iter().rev() {
                name.push_str(&format!("{:x}.{:x}.", b & 0x0F, b >> 4));
            }
            name.push_str("ip6.arpa.");
            name
        }
    }
}
