// Test resolvers shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use dnschase::clients::Resolver;
use dnschase::types::*;
use dnschase::{CancellationToken, Error, Result};
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A recursion desired query for `name`.
pub fn query(name: &str) -> Message {
    let mut m = Message {
        id: 0xbeef,
        rd: true,

        ..Default::default()
    };
    m.add_question(name, Type::A, Class::Internet);
    m
}

/// A response to `request` with no records, and the given rcode.
pub fn response(request: &Message, rcode: Rcode) -> Message {
    Message {
        id: request.id,
        qr: QR::Response,
        rd: request.rd,
        rcode,
        questions: request.questions.clone(),

        ..Default::default()
    }
}

pub fn a_record(name: &str, ip: &str) -> Record {
    Record::new(name, Duration::from_secs(300), Resource::A(ip.parse().unwrap()))
}

pub fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

/// Always answers with one A record for 192.168.0.1.
pub struct IpAddressResolver;

#[async_trait]
impl Resolver for IpAddressResolver {
    async fn resolve(&self, request: &Message, _cancel: &CancellationToken) -> Result<Message> {
        let mut m = response(request, Rcode::NoError);
        m.answers.push(a_record("google.com.", "192.168.0.1"));
        Ok(m)
    }
}

/// Always answers with one PTR record for google.com.
pub struct PointerResolver;

#[async_trait]
impl Resolver for PointerResolver {
    async fn resolve(&self, request: &Message, _cancel: &CancellationToken) -> Result<Message> {
        let mut m = response(request, Rcode::NoError);
        m.answers.push(Record::new(
            "1.0.168.192.in-addr.arpa.",
            Duration::from_secs(300),
            Resource::PTR("google.com".to_string()),
        ));
        Ok(m)
    }
}

/// Always responds with the given rcode, and no records.
pub struct RcodeResolver(pub Rcode);

#[async_trait]
impl Resolver for RcodeResolver {
    async fn resolve(&self, request: &Message, _cancel: &CancellationToken) -> Result<Message> {
        Ok(response(request, self.0))
    }
}

pub fn name_error() -> RcodeResolver {
    RcodeResolver(Rcode::NXDomain)
}

/// Always fails, with the given message.
pub struct FailingResolver(pub &'static str);

#[async_trait]
impl Resolver for FailingResolver {
    async fn resolve(&self, _request: &Message, _cancel: &CancellationToken) -> Result<Message> {
        Err(Error::from(self.0))
    }
}

pub struct PanickingResolver;

#[async_trait]
impl Resolver for PanickingResolver {
    async fn resolve(&self, _request: &Message, _cancel: &CancellationToken) -> Result<Message> {
        panic!("not implemented")
    }
}

/// Returns a clone of a fixed response.
pub struct FixedResolver(pub Message);

#[async_trait]
impl Resolver for FixedResolver {
    async fn resolve(&self, _request: &Message, _cancel: &CancellationToken) -> Result<Message> {
        Ok(self.0.clone())
    }
}

/// Waits before handing on to the inner resolver, giving up early if
/// cancelled. Records what happened, and how often it was called.
pub struct DelayedResolver<R> {
    pub delay: Duration,
    pub inner: R,

    pub calls: AtomicUsize,
    pub cancelled: AtomicBool,
}

impl<R> DelayedResolver<R> {
    pub fn new(delay_ms: u64, inner: R) -> Arc<Self> {
        Arc::new(DelayedResolver {
            delay: Duration::from_millis(delay_ms),
            inner,
            calls: AtomicUsize::new(0),
            cancelled: AtomicBool::new(false),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R: Resolver> Resolver for DelayedResolver<R> {
    async fn resolve(&self, request: &Message, cancel: &CancellationToken) -> Result<Message> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        tokio::select! {
            _ = cancel.cancelled() => {
                self.cancelled.store(true, Ordering::SeqCst);
                Err(Error::Cancelled)
            }
            _ = tokio::time::sleep(self.delay) => self.inner.resolve(request, cancel).await,
        }
    }
}

/// Like DelayedResolver, but ignores cancellation. Sets `finished` once the
/// inner resolver has been called.
pub struct StubbornResolver<R> {
    pub delay: Duration,
    pub inner: R,
    pub finished: AtomicBool,
}

impl<R> StubbornResolver<R> {
    pub fn new(delay_ms: u64, inner: R) -> Arc<Self> {
        Arc::new(StubbornResolver {
            delay: Duration::from_millis(delay_ms),
            inner,
            finished: AtomicBool::new(false),
        })
    }

    pub fn has_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R: Resolver> Resolver for StubbornResolver<R> {
    async fn resolve(&self, request: &Message, cancel: &CancellationToken) -> Result<Message> {
        tokio::time::sleep(self.delay).await;
        self.finished.store(true, Ordering::SeqCst);
        self.inner.resolve(request, cancel).await
    }
}
