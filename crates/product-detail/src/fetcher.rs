//! 客户端徽章拉取
//!
//! 每个 [`BadgeFetcher`] 对应页面上的一个徽章条组件：挂载或端点变化时发起请求，
//! 卸载或端点变化时取消在途请求。状态通过 `watch` 通道广播。
//!
//! 每次写入状态都按代数做 compare-and-set：请求启动时记下当前代数，
//! 只有结果返回时通道中的代数仍相同才会写入，被取代的请求即使晚到也会被丢弃。

use std::sync::Arc;

use rule_engine::BadgeDescriptor;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::transport::{BadgeTransport, TransportError, coerce_badges};

/// 徽章条状态
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    /// 请求未完成，不渲染
    #[default]
    Unresolved,
    /// 请求已完成；失败也归为空列表
    Resolved(Vec<BadgeDescriptor>),
}

impl FetchState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn badges(&self) -> &[BadgeDescriptor] {
        match self {
            Self::Unresolved => &[],
            Self::Resolved(badges) => badges,
        }
    }

    /// 未完成与已完成但为空都算空
    pub fn is_empty(&self) -> bool {
        self.badges().is_empty()
    }

    /// 只有非空结果才渲染徽章条
    pub fn should_render(&self) -> bool {
        !self.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
struct Snapshot {
    generation: u64,
    state: FetchState,
}

struct InFlight {
    endpoint: String,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl InFlight {
    fn cancel(self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

/// 徽章拉取器
pub struct BadgeFetcher<T> {
    transport: Arc<T>,
    tx: Arc<watch::Sender<Snapshot>>,
    generation: u64,
    current: Option<InFlight>,
}

impl<T: BadgeTransport + 'static> BadgeFetcher<T> {
    pub fn new(transport: Arc<T>) -> Self {
        let (tx, _rx) = watch::channel(Snapshot::default());
        Self {
            transport,
            tx: Arc::new(tx),
            generation: 0,
            current: None,
        }
    }

    /// 组件挂载
    pub fn mount(&mut self, endpoint: impl Into<String>) {
        self.set_endpoint(endpoint);
    }

    /// 切换端点：取消在途请求，状态回到未完成，并发起新请求
    ///
    /// 端点与当前相同时不做任何事。需要在 tokio 运行时内调用。
    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) {
        let endpoint = endpoint.into();
        if self.endpoint() == Some(endpoint.as_str()) {
            return;
        }

        if let Some(previous) = self.current.take() {
            debug!(endpoint = %previous.endpoint, "端点变化，取消在途徽章请求");
            previous.cancel();
        }

        self.generation += 1;
        let generation = self.generation;
        self.tx.send_replace(Snapshot {
            generation,
            state: FetchState::Unresolved,
        });

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_fetch(
            self.transport.clone(),
            endpoint.clone(),
            generation,
            cancel.clone(),
            self.tx.clone(),
        ));

        self.current = Some(InFlight {
            endpoint,
            cancel,
            handle,
        });
    }

    /// 组件卸载：取消在途请求，之后到达的任何结果都不会写入
    pub fn unmount(&mut self) {
        let Some(current) = self.current.take() else {
            return;
        };
        current.cancel();

        self.generation += 1;
        let generation = self.generation;
        self.tx.send_if_modified(|snapshot| {
            snapshot.generation = generation;
            false
        });
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.endpoint.as_str())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> FetchState {
        self.tx.borrow().state.clone()
    }

    pub fn subscribe(&self) -> BadgeWatch {
        BadgeWatch {
            rx: self.tx.subscribe(),
        }
    }
}

impl<T> Drop for BadgeFetcher<T> {
    fn drop(&mut self) {
        if let Some(current) = self.current.take() {
            current.cancel();
        }
    }
}

/// 状态订阅端
#[derive(Debug, Clone)]
pub struct BadgeWatch {
    rx: watch::Receiver<Snapshot>,
}

impl BadgeWatch {
    pub fn current(&self) -> FetchState {
        self.rx.borrow().state.clone()
    }

    /// 等待状态变为已完成；拉取器被销毁时返回 None
    pub async fn resolved(&mut self) -> Option<Vec<BadgeDescriptor>> {
        self.rx
            .wait_for(|snapshot| snapshot.state.is_resolved())
            .await
            .ok()
            .map(|snapshot| snapshot.state.badges().to_vec())
    }

    /// 等待下一次状态变化
    pub async fn changed(&mut self) -> Option<FetchState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().state.clone())
    }
}

async fn run_fetch<T: BadgeTransport>(
    transport: Arc<T>,
    endpoint: String,
    generation: u64,
    cancel: CancellationToken,
    tx: Arc<watch::Sender<Snapshot>>,
) {
    let state = match transport.fetch(&endpoint, cancel.clone()).await {
        Ok(body) => FetchState::Resolved(coerce_badges(&body)),
        Err(TransportError::Cancelled) => {
            debug!(endpoint = %endpoint, generation, "徽章请求已取消");
            return;
        }
        Err(e) => {
            debug!(endpoint = %endpoint, error = %e, "徽章请求失败，按空列表处理");
            FetchState::Resolved(Vec::new())
        }
    };

    if cancel.is_cancelled() || !apply(&tx, generation, state) {
        debug!(endpoint = %endpoint, generation, "丢弃过期的徽章响应");
    }
}

/// 代数一致时写入状态，返回是否写入
fn apply(tx: &watch::Sender<Snapshot>, generation: u64, state: FetchState) -> bool {
    tx.send_if_modified(|snapshot| {
        if snapshot.generation != generation {
            return false;
        }
        snapshot.state = state;
        true
    })
}
