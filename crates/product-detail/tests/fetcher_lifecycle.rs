//! 徽章拉取器生命周期测试
//!
//! 使用可控的传输实现，按需放行每个端点的响应，验证取消与过期响应丢弃。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use product_detail::{BadgeFetcher, BadgeTransport, FetchState, TransportError};
use serde_json::{Value, json};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// 每个端点的响应由测试手动放行；不主动观察取消令牌
#[derive(Default)]
struct GatedTransport {
    gates: Mutex<HashMap<String, oneshot::Receiver<Value>>>,
    tokens: Mutex<HashMap<String, CancellationToken>>,
}

impl GatedTransport {
    fn gate(&self, endpoint: &str) -> oneshot::Sender<Value> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(endpoint.to_string(), rx);
        tx
    }

    fn token(&self, endpoint: &str) -> Option<CancellationToken> {
        self.tokens.lock().unwrap().get(endpoint).cloned()
    }
}

#[async_trait]
impl BadgeTransport for GatedTransport {
    async fn fetch(&self, endpoint: &str, cancel: CancellationToken) -> Result<Value, TransportError> {
        self.tokens
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), cancel);

        let gate = self.gates.lock().unwrap().remove(endpoint);
        match gate {
            Some(rx) => rx.await.map_err(|_| TransportError::Status(599)),
            None => Err(TransportError::Status(404)),
        }
    }
}

fn badges_body(key: &str) -> Value {
    json!({ "badges": [{ "key": key, "label": key, "variant": "sale" }] })
}

fn keys(state: &FetchState) -> Vec<String> {
    state.badges().iter().map(|b| b.key.clone()).collect()
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[tokio::test]
async fn stale_response_never_overwrites_latest() {
    let transport = Arc::new(GatedTransport::default());
    let release_a = transport.gate("/a");
    let release_b = transport.gate("/b");

    let mut fetcher = BadgeFetcher::new(transport.clone());
    let mut watch = fetcher.subscribe();

    fetcher.mount("/a");
    settle().await;
    fetcher.set_endpoint("/b");

    assert!(transport.token("/a").unwrap().is_cancelled());
    assert_eq!(fetcher.state(), FetchState::Unresolved);

    release_b.send(badges_body("from-b")).unwrap();
    let badges = watch.resolved().await.unwrap();
    assert_eq!(badges[0].key, "from-b");

    // A 的任务已被取消，发送可能失败
    let _ = release_a.send(badges_body("from-a"));
    settle().await;

    assert_eq!(keys(&fetcher.state()), vec!["from-b"]);
    assert_eq!(fetcher.endpoint(), Some("/b"));
}

#[tokio::test]
async fn switching_before_first_resolution_applies_only_latest() {
    let transport = Arc::new(GatedTransport::default());
    let release_a = transport.gate("/a");
    let release_b = transport.gate("/b");
    let release_c = transport.gate("/c");

    let mut fetcher = BadgeFetcher::new(transport.clone());
    let mut watch = fetcher.subscribe();

    fetcher.mount("/a");
    fetcher.set_endpoint("/b");
    fetcher.set_endpoint("/c");
    settle().await;

    let _ = release_a.send(badges_body("from-a"));
    let _ = release_b.send(badges_body("from-b"));
    settle().await;
    assert_eq!(watch.current(), FetchState::Unresolved);

    release_c.send(badges_body("from-c")).unwrap();
    let badges = watch.resolved().await.unwrap();
    assert_eq!(badges.len(), 1);
    assert_eq!(badges[0].key, "from-c");
}

#[tokio::test]
async fn unmount_discards_late_response() {
    let transport = Arc::new(GatedTransport::default());
    let release = transport.gate("/a");

    let mut fetcher = BadgeFetcher::new(transport.clone());
    fetcher.mount("/a");
    settle().await;

    let generation = fetcher.generation();
    fetcher.unmount();

    assert!(fetcher.generation() > generation);
    assert!(transport.token("/a").unwrap().is_cancelled());
    assert_eq!(fetcher.endpoint(), None);

    let _ = release.send(badges_body("late"));
    settle().await;

    assert_eq!(fetcher.state(), FetchState::Unresolved);
}

#[tokio::test]
async fn remount_after_unmount_fetches_again() {
    let transport = Arc::new(GatedTransport::default());
    let _first = transport.gate("/a");

    let mut fetcher = BadgeFetcher::new(transport.clone());
    let mut watch = fetcher.subscribe();
    fetcher.mount("/a");
    settle().await;
    fetcher.unmount();

    let second = transport.gate("/a");
    fetcher.mount("/a");
    settle().await;
    second.send(badges_body("again")).unwrap();

    let badges = watch.resolved().await.unwrap();
    assert_eq!(badges[0].key, "again");
}

#[tokio::test]
async fn dropping_fetcher_cancels_in_flight_request() {
    let transport = Arc::new(GatedTransport::default());
    let _gate = transport.gate("/a");

    let mut fetcher = BadgeFetcher::new(transport.clone());
    let mut watch = fetcher.subscribe();
    fetcher.mount("/a");
    settle().await;

    drop(fetcher);

    assert!(transport.token("/a").unwrap().is_cancelled());
    assert_eq!(watch.resolved().await, None);
}
