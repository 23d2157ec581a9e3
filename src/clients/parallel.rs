use crate::clients::Resolver;
use crate::errors::{Error, Result};
use crate::types::Rcode;
use crate::Message;
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Resolves requests using multiple [`Resolver`]s at once, taking the first
/// [`Rcode::NoError`] response.
///
/// All the inner resolvers are started together, and their outcomes are
/// considered in the order they finish:
///
/// * The first `NoError` response wins, and is returned straight away.
/// * Any other response is kept as a fall back, a later one replacing an
///   earlier one. It is returned if no resolver manages a `NoError`.
/// * Failures are collected, and only returned (as [`Error::AllFailed`]) if
///   no resolver produced any response at all.
///
/// Once a winner is found the remaining resolvers are told to cancel, and
/// left to finish in the background. Their results are discarded.
///
/// # Example
///
/// ```rust,no_run
/// use dnschase::clients::{ParallelResolver, Resolver, UdpResolver};
/// use dnschase::types::*;
/// use dnschase::CancellationToken;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), dnschase::Error> {
///     let resolver = ParallelResolver::new(vec![
///         Arc::new(UdpResolver::new("8.8.8.8:53".parse().unwrap())),
///         Arc::new(UdpResolver::new("1.1.1.1:53".parse().unwrap())),
///     ])?;
///
///     let mut query = Message::default();
///     query.rd = true;
///     query.add_question("bramp.net", Type::A, Class::Internet);
///
///     let response = resolver.resolve(&query, &CancellationToken::new()).await?;
///     println!("{}", response);
///     Ok(())
/// }
/// ```
pub struct ParallelResolver {
    resolvers: Vec<Arc<dyn Resolver>>,
}

impl ParallelResolver {
    /// Creates a new ParallelResolver racing all of `resolvers`.
    ///
    /// Fails with [`Error::NoResolvers`] if `resolvers` is empty.
    pub fn new(resolvers: Vec<Arc<dyn Resolver>>) -> Result<Self> {
        if resolvers.is_empty() {
            return Err(Error::NoResolvers);
        }

        Ok(ParallelResolver { resolvers })
    }

    /// Creates a new ParallelResolver from a list where some resolvers may be
    /// absent.
    ///
    /// Fails with [`Error::MissingResolver`] naming the first absent slot, or
    /// [`Error::NoResolvers`] if the list is empty.
    pub fn from_slots(slots: Vec<Option<Arc<dyn Resolver>>>) -> Result<Self> {
        let resolvers = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(Error::MissingResolver { index }))
            .collect::<Result<Vec<_>>>()?;

        ParallelResolver::new(resolvers)
    }

    /// The number of resolvers raced.
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// Always false, a ParallelResolver can't be constructed empty.
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

#[async_trait]
impl Resolver for ParallelResolver {
    async fn resolve(&self, request: &Message, cancel: &CancellationToken) -> Result<Message> {
        // Cancelled when we are done, or when the caller cancels.
        let done = cancel.child_token();
        let request = Arc::new(request.clone());

        // Each resolve is called inside its own task, so one that fails (or
        // panics) straight away is handled the same as one that takes a while.
        let mut pending = JoinSet::new();
        for resolver in &self.resolvers {
            let resolver = Arc::clone(resolver);
            let request = Arc::clone(&request);
            let cancel = done.clone();

            pending.spawn(async move { resolver.resolve(&request, &cancel).await });
        }

        let mut response = None;
        let mut failures = Vec::new();

        while let Some(result) = pending.join_next().await {
            match result {
                Ok(Ok(m)) if m.rcode == Rcode::NoError => {
                    response = Some(m);
                    break;
                }
                Ok(Ok(m)) => {
                    debug!("keeping {} response while {} resolvers remain", m.rcode, pending.len());
                    response = Some(m);
                }
                Ok(Err(e)) => {
                    debug!("resolver failed: {}", e);
                    failures.push(e);
                }
                Err(e) => {
                    debug!("resolver task failed: {}", e);
                    failures.push(Error::Join(e));
                }
            }
        }

        done.cancel();

        if !pending.is_empty() {
            debug!("detaching {} unfinished resolvers", pending.len());

            // Dropping a JoinSet aborts its tasks, detaching lets them see
            // the cancellation instead. Whatever they return is discarded.
            pending.detach_all();
        }

        response.ok_or(Error::AllFailed(failures))
    }
}
