mod common;

use async_trait::async_trait;
use common::*;
use dnschase::clients::{Client, ParallelResolver, Resolver};
use dnschase::types::*;
use dnschase::{CancellationToken, Error, Result};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn parallel(resolvers: Vec<Arc<dyn Resolver>>) -> Client {
    Client::new(Arc::new(ParallelResolver::new(resolvers).unwrap()))
}

#[tokio::test]
async fn lookup() {
    init_logger();

    let client = Client::new(Arc::new(IpAddressResolver));
    let ips = client.lookup("google.com").await.unwrap();

    // Both the A and AAAA queries get the same answer, so one remains.
    assert_eq!(ips, vec![ip("192.168.0.1")]);
}

#[tokio::test]
async fn reverse() {
    init_logger();

    let client = Client::new(Arc::new(PointerResolver));
    let name = client.reverse(ip("192.168.0.1")).await.unwrap();

    assert_eq!(name, "google.com");
}

#[tokio::test]
async fn reverse_without_pointer() {
    init_logger();

    let client = Client::new(Arc::new(IpAddressResolver));
    let err = client
        .reverse(ip("192.168.0.1"))
        .await
        .expect_err("no PTR records");

    assert!(
        matches!(&err, Error::NoRecords(name) if name == "1.0.168.192.in-addr.arpa."),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn parallel_lookup() {
    init_logger();

    let client = parallel(vec![Arc::new(name_error()), Arc::new(IpAddressResolver)]);
    let ips = client.lookup("google.com").await.unwrap();

    assert_eq!(ips, vec![ip("192.168.0.1")]);
}

#[tokio::test]
async fn parallel_lookup_name_errors() {
    init_logger();

    let client = parallel(vec![
        Arc::new(name_error()),
        Arc::new(name_error()),
        Arc::new(FailingResolver("not implemented")),
        Arc::new(FailingResolver("not implemented")),
    ]);
    let err = client.lookup("google.com").await.expect_err("should fail");

    assert!(
        matches!(err, Error::Response(Rcode::NXDomain)),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn parallel_lookup_failures() {
    init_logger();

    let client = parallel(vec![
        Arc::new(FailingResolver("not implemented")),
        Arc::new(FailingResolver("not implemented")),
    ]);
    let err = client.lookup("google.com").await.expect_err("should fail");

    assert!(matches!(err, Error::AllFailed(_)), "got {:?}", err);
    assert_eq!(err.failures().len(), 2);
}

#[tokio::test]
async fn name_error_lookup() {
    init_logger();

    let client = Client::new(Arc::new(name_error()));
    let err = client.lookup("google.com").await.expect_err("should fail");

    assert!(
        matches!(err, Error::Response(Rcode::NXDomain)),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn lookup_without_addresses() {
    init_logger();

    let client = Client::new(Arc::new(RcodeResolver(Rcode::NoError)));
    let err = client.lookup("google.com").await.expect_err("should fail");

    assert!(
        matches!(&err, Error::NoRecords(name) if name == "google.com"),
        "got {:?}",
        err
    );
}

/// Answers A queries with 192.0.2.1, and AAAA queries with 2001:db8::1.
struct DualStackResolver;

#[async_trait]
impl Resolver for DualStackResolver {
    async fn resolve(&self, request: &Message, _cancel: &CancellationToken) -> Result<Message> {
        let mut m = response(request, Rcode::NoError);
        let resource = match request.questions[0].r#type {
            Type::A => Resource::A("192.0.2.1".parse().unwrap()),
            Type::AAAA => Resource::AAAA("2001:db8::1".parse().unwrap()),
            _ => return Ok(m),
        };
        m.answers.push(Record::new(
            "example.com.",
            Duration::from_secs(60),
            resource,
        ));
        m.answers.push(Record::new(
            "example.com.",
            Duration::from_secs(60),
            Resource::CNAME("alias.example.com.".to_string()),
        ));
        Ok(m)
    }
}

#[tokio::test]
async fn lookup_merges_both_families() {
    init_logger();

    let client = Client::new(Arc::new(DualStackResolver));
    let ips = client.lookup("example.com").await.unwrap();

    assert_eq!(ips, vec![ip("192.0.2.1"), ip("2001:db8::1")]);
}

#[tokio::test]
async fn resolve_returns_the_response() {
    init_logger();

    let client = Client::new(Arc::new(DualStackResolver));
    let response = client.resolve("example.com", Type::AAAA).await.unwrap();

    assert_eq!(response.questions[0].name, "example.com.");
    assert_eq!(response.questions[0].r#type, Type::AAAA);
    assert_eq!(response.answers.len(), 2);
}
