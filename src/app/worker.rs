// ==========================================
// 车险经营分析引擎 - 后台工作线程与异步客户端
// ==========================================
// 职责:
//   - EngineWorker: 在独立线程上运行分发器,按到达顺序逐条处理
//   - EngineClient: 以 id 关联请求与响应 (待决请求表 + 单一响应路由)
// 规则:
//   - 引擎内部不可取消;超时只是调用方放弃等待
//   - 超时请求的迟到响应由路由丢弃并告警,不会交给后续调用
// ==========================================

use crate::api::{ErrorPayload, Request, RequestEnvelope, Response, ResponseEnvelope};
use crate::app::dispatcher::Dispatcher;
use crate::config::InitPayload;
use crate::domain::{FilterState, Record};
use crate::engine::AnalysisReport;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// 默认请求超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ==========================================
// EngineWorker
// ==========================================
pub struct EngineWorker {
    pub requests: mpsc::UnboundedSender<RequestEnvelope>,
    pub responses: mpsc::UnboundedReceiver<ResponseEnvelope>,
    pub thread: thread::JoinHandle<()>,
}

impl EngineWorker {
    /// 启动工作线程；请求通道关闭后线程退出
    pub fn spawn(mut dispatcher: Dispatcher) -> std::io::Result<Self> {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<RequestEnvelope>();
        let (response_tx, response_rx) = mpsc::unbounded_channel::<ResponseEnvelope>();

        let thread = thread::Builder::new()
            .name("kpi-engine".to_string())
            .spawn(move || {
                tracing::info!("引擎工作线程启动");
                while let Some(envelope) = request_rx.blocking_recv() {
                    let response = dispatcher.handle(envelope);
                    if response_tx.send(response).is_err() {
                        break;
                    }
                }
                tracing::info!("引擎工作线程退出");
            })?;

        Ok(Self {
            requests: request_tx,
            responses: response_rx,
            thread,
        })
    }
}

// ==========================================
// ClientError
// ==========================================
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("请求超时 (id={id}, 超时 {timeout:?}),响应将被丢弃")]
    Timeout { id: u64, timeout: Duration },

    #[error("引擎已停止")]
    EngineStopped,

    #[error("引擎线程启动失败: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("引擎返回错误 [{}]: {}", .0.kind, .0.message)]
    Engine(ErrorPayload),

    #[error("响应类型不符: 期望 {expected}")]
    UnexpectedResponse { expected: &'static str },
}

type PendingTable = Arc<Mutex<HashMap<u64, oneshot::Sender<ResponseEnvelope>>>>;

fn lock(pending: &PendingTable) -> MutexGuard<'_, HashMap<u64, oneshot::Sender<ResponseEnvelope>>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

// ==========================================
// EngineClient
// ==========================================
pub struct EngineClient {
    requests: mpsc::UnboundedSender<RequestEnvelope>,
    pending: PendingTable,
    next_id: AtomicU64,
    timeout: Duration,
    router: JoinHandle<()>,
}

impl EngineClient {
    /// 启动工作线程与响应路由（需在 tokio 运行时内调用）
    pub fn spawn(dispatcher: Dispatcher) -> Result<Self, ClientError> {
        let EngineWorker {
            requests,
            mut responses,
            ..
        } = EngineWorker::spawn(dispatcher)?;

        let pending: PendingTable = Arc::new(Mutex::new(HashMap::new()));
        let router_pending = Arc::clone(&pending);

        let router = tokio::spawn(async move {
            while let Some(envelope) = responses.recv().await {
                let waiter = envelope.id.and_then(|id| lock(&router_pending).remove(&id));
                match waiter {
                    Some(tx) => {
                        let _ = tx.send(envelope);
                    }
                    None => tracing::warn!("丢弃无人等待的响应: id={:?}", envelope.id),
                }
            }
            // 引擎退出,唤醒所有等待者
            lock(&router_pending).clear();
        });

        Ok(Self {
            requests,
            pending,
            next_id: AtomicU64::new(1),
            timeout: DEFAULT_TIMEOUT,
            router,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn call(&self, request: Request) -> Result<Response, ClientError> {
        self.call_with_timeout(request, self.timeout).await
    }

    pub async fn call_with_timeout(
        &self,
        request: Request,
        timeout: Duration,
    ) -> Result<Response, ClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        lock(&self.pending).insert(id, tx);

        if self.requests.send(RequestEnvelope { id, request }).is_err() {
            lock(&self.pending).remove(&id);
            return Err(ClientError::EngineStopped);
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(envelope)) => match envelope.response {
                Response::Error(payload) => Err(ClientError::Engine(payload)),
                response => Ok(response),
            },
            Ok(Err(_)) => Err(ClientError::EngineStopped),
            Err(_) => {
                lock(&self.pending).remove(&id);
                tracing::warn!("请求超时,放弃等待: id={}, timeout={:?}", id, timeout);
                Err(ClientError::Timeout { id, timeout })
            }
        }
    }

    // ==========================================
    // 便捷方法
    // ==========================================

    pub async fn init(&self, payload: InitPayload) -> Result<(), ClientError> {
        self.call(Request::Init(payload)).await.map(|_| ())
    }

    pub async fn load_dataset(&self, records: Vec<Record>) -> Result<usize, ClientError> {
        match self.call(Request::LoadDataset(records)).await? {
            Response::Loaded(summary) => Ok(summary.row_count),
            _ => Err(ClientError::UnexpectedResponse { expected: "loaded" }),
        }
    }

    pub async fn process(&self) -> Result<AnalysisReport, ClientError> {
        Self::expect_report(self.call(Request::Process).await?)
    }

    pub async fn filter(&self, state: FilterState) -> Result<AnalysisReport, ClientError> {
        Self::expect_report(self.call(Request::Filter(state)).await?)
    }

    pub async fn dimension_values(
        &self,
        dimension: &str,
        current_filters: Option<FilterState>,
    ) -> Result<Vec<String>, ClientError> {
        let request = Request::GetDimensionValues {
            dimension: dimension.to_string(),
            current_filters,
        };
        match self.call(request).await? {
            Response::DimensionValues { values, .. } => Ok(values),
            _ => Err(ClientError::UnexpectedResponse {
                expected: "dimension_values",
            }),
        }
    }

    pub async fn clear(&self) -> Result<(), ClientError> {
        self.call(Request::Clear).await.map(|_| ())
    }

    /// 尚未收到响应的请求数
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    /// 关闭请求通道并等待路由退出
    pub async fn shutdown(self) {
        let EngineClient {
            requests, router, ..
        } = self;
        drop(requests);
        if let Err(e) = router.await {
            tracing::warn!("响应路由异常退出: {}", e);
        }
    }

    fn expect_report(response: Response) -> Result<AnalysisReport, ClientError> {
        match response {
            Response::Report(report) => Ok(*report),
            _ => Err(ClientError::UnexpectedResponse { expected: "report" }),
        }
    }
}
