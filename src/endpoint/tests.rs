//! Tests for the endpoint module

use super::*;
use crate::error::{Error, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

// ============================================================================
// BaseEndpoint Tests
// ============================================================================

#[tokio::test]
async fn test_immediate_base() {
    let base = BaseEndpoint::immediate("https://api.example.com/users");
    assert!(!base.is_pending());
    assert_eq!(base.peek(), Some("https://api.example.com/users"));
    assert_eq!(base.resolve().await.unwrap(), "https://api.example.com/users");
}

#[tokio::test]
async fn test_pending_base_resolves() {
    let base = BaseEndpoint::pending(async { Ok("https://svc.internal/users".to_string()) });
    assert!(base.is_pending());
    assert_eq!(base.peek(), None);

    assert_eq!(base.resolve().await.unwrap(), "https://svc.internal/users");
    assert_eq!(base.peek(), Some("https://svc.internal/users"));
}

#[tokio::test]
async fn test_pending_base_failure_is_reported_again() {
    let base = BaseEndpoint::pending(async { Err::<String, _>(Error::config("registry down")) });

    let first = base.resolve().await.unwrap_err();
    let second = base.resolve().await.unwrap_err();

    assert!(matches!(first, Error::EndpointResolution { .. }));
    assert!(first.to_string().contains("registry down"));
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(base.peek(), None);
}

#[tokio::test]
async fn test_discover_retries_after_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let base = BaseEndpoint::discover(move || {
        let attempt = counter.fetch_add(1, Ordering::SeqCst);
        async move {
            if attempt == 0 {
                Err(Error::endpoint("not registered yet"))
            } else {
                Ok("https://svc.internal/orders".to_string())
            }
        }
    });

    assert!(base.resolve().await.is_err());
    assert_eq!(base.resolve().await.unwrap(), "https://svc.internal/orders");
    // Success is memoised.
    assert_eq!(base.resolve().await.unwrap(), "https://svc.internal/orders");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_discover_accepts_anyhow_errors() {
    fn lookup(registered: bool) -> anyhow::Result<String> {
        anyhow::ensure!(registered, "service not registered");
        Ok("https://svc.internal/invoices".to_string())
    }

    let base = BaseEndpoint::discover(|| async { Ok::<_, Error>(lookup(false)?) });

    let err = base.resolve().await.unwrap_err();
    assert!(matches!(err, Error::Anyhow(_)));
    assert_eq!(err.to_string(), "service not registered");
}

#[tokio::test]
async fn test_concurrent_resolution_runs_source_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let base = BaseEndpoint::discover(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok("https://svc.internal/items".to_string())
        }
    });

    let resolutions = (0..16).map(|_| base.resolve());
    let results: Vec<Result<String>> = futures::future::join_all(resolutions).await;

    for result in results {
        assert_eq!(result.unwrap(), "https://svc.internal/items");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_clones_share_resolution() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let base = BaseEndpoint::discover(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok("https://svc.internal/a".to_string()) }
    });
    let copy = base.clone();

    base.resolve().await.unwrap();
    copy.resolve().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_base_endpoint_from_str() {
    let base: BaseEndpoint = "/api/users".into();
    assert!(matches!(base, BaseEndpoint::Immediate(ref s) if s == "/api/users"));
}

// ============================================================================
// EndpointResolver Tests
// ============================================================================

#[tokio::test]
async fn test_resolve_by_id_immediate() {
    let resolver = EndpointResolver::new("https://api.example.com/users");
    assert_eq!(
        resolver.resolve_by_id("42").await.unwrap(),
        "https://api.example.com/users/42"
    );
}

#[tokio::test]
async fn test_resolve_by_id_does_not_validate_id() {
    let resolver = EndpointResolver::new("/users");
    assert_eq!(resolver.resolve_by_id("").await.unwrap(), "/users/");
    assert_eq!(resolver.resolve_by_id("a/b").await.unwrap(), "/users/a/b");
}

#[tokio::test]
async fn test_resolve_by_id_waits_for_late_base() {
    let (tx, rx) = oneshot::channel::<String>();
    let resolver = EndpointResolver::new(BaseEndpoint::pending(async move {
        rx.await.map_err(|e| Error::endpoint(e.to_string()))
    }));

    let waiting = {
        let resolver = resolver.clone();
        tokio::spawn(async move { resolver.resolve_by_id("7").await })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;
    tx.send("https://late.example.com/things".to_string()).unwrap();

    assert_eq!(
        waiting.await.unwrap().unwrap(),
        "https://late.example.com/things/7"
    );
    assert_eq!(
        resolver.resolve_by_id("8").await.unwrap(),
        "https://late.example.com/things/8"
    );
}

#[tokio::test]
async fn test_resolve_by_id_propagates_base_failure() {
    let resolver = EndpointResolver::new(BaseEndpoint::discover(|| async {
        Err::<String, _>(Error::endpoint("no such service"))
    }));

    let err = resolver.resolve_by_id("1").await.unwrap_err();
    assert!(err.to_string().contains("no such service"));
}

#[tokio::test]
async fn test_extension_endpoints() {
    let resolver = EndpointResolver::new("/users")
        .with_extension("search", "/users/search")
        .with_extension(
            "export",
            BaseEndpoint::pending(async { Ok("/exports/users".to_string()) }),
        );

    assert_eq!(resolver.resolve("search").await.unwrap(), "/users/search");
    assert_eq!(resolver.resolve("export").await.unwrap(), "/exports/users");

    let mut names: Vec<_> = resolver.extension_names().collect();
    names.sort_unstable();
    assert_eq!(names, vec!["export", "search"]);

    let err = resolver.resolve("missing").await.unwrap_err();
    assert!(matches!(err, Error::UnknownEndpoint { ref name } if name == "missing"));
}
