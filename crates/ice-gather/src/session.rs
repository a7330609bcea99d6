//! 候选收集会话
//!
//! `GatherSession` 持有唯一的协商连接、三类累积集合与收集窗口时长。
//! 每次 `gather` 清空集合，必要时创建连接，然后等满固定窗口再返回快照。
//! 候选事件由每个连接各自的事件泵任务分类并写入集合。
//!
//! 状态流转：
//! `Idle → Connecting → Gathering (每条候选) → Closed (候选结束)`，
//! 窗口到期后任意状态 → `Resolved`。候选结束不会提前结束窗口。

use crate::accumulator::Accumulator;
use crate::classifier::classify_with;
use crate::error::{GatherError, Result};
use crate::platform::{
    CandidateEvent, CandidateReceiver, IcePlatform, NegotiationConnection, NegotiationOutcome,
};
use crate::report::GatherReport;
use ipfinder_common::{ConcurrencyPolicy, GatherConfig, IpMatching, TimeoutLimit};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// 收集周期所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatherPhase {
    Idle,
    Connecting,
    Gathering,
    Closed,
    Resolved,
}

/// 固定时长的收集窗口，与候选是否已经结束无关
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatherWindow {
    duration: Duration,
}

impl GatherWindow {
    pub fn new(limit: TimeoutLimit) -> Self {
        Self {
            duration: limit.as_duration(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub async fn elapse(self) {
        tokio::time::sleep(self.duration).await;
    }
}

struct ActiveConnection {
    id: u64,
    handle: Arc<dyn NegotiationConnection>,
}

struct SessionState {
    connection: Option<ActiveConnection>,
    accumulator: Accumulator,
    phase: GatherPhase,
}

type SharedState = Arc<Mutex<SessionState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, SessionState> {
    state.lock().expect("gather session state poisoned")
}

/// 候选收集会话
pub struct GatherSession {
    platform: Arc<dyn IcePlatform>,
    state: SharedState,
    timeout: Mutex<TimeoutLimit>,
    policy: ConcurrencyPolicy,
    ip_matching: IpMatching,
    data_channel_label: String,
    next_connection_id: AtomicU64,
    in_flight: tokio::sync::Mutex<()>,
}

impl GatherSession {
    pub fn new(platform: Arc<dyn IcePlatform>, config: &GatherConfig) -> Self {
        Self {
            platform,
            state: Arc::new(Mutex::new(SessionState {
                connection: None,
                accumulator: Accumulator::new(),
                phase: GatherPhase::Idle,
            })),
            timeout: Mutex::new(config.timeout_limit()),
            policy: config.concurrency,
            ip_matching: config.ip_matching,
            data_channel_label: config.data_channel_label.clone(),
            next_connection_id: AtomicU64::new(1),
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// 钳制到 [1, 60] 后保存，供下一次收集使用
    pub fn set_timeout_limit(&self, secs: f64) -> TimeoutLimit {
        let limit = TimeoutLimit::clamped(secs);
        *self.timeout.lock().expect("timeout limit poisoned") = limit;
        info!("Timeout limit set to {} seconds.", limit);
        limit
    }

    pub fn timeout_limit(&self) -> TimeoutLimit {
        *self.timeout.lock().expect("timeout limit poisoned")
    }

    pub fn phase(&self) -> GatherPhase {
        lock(&self.state).phase
    }

    pub fn has_active_connection(&self) -> bool {
        lock(&self.state).connection.is_some()
    }

    /// 执行一次完整的收集周期
    ///
    /// 只有在拒绝策略下遇到并发请求时才返回错误；
    /// 平台侧的失败只记录日志，窗口照常等满并返回空结果。
    pub async fn gather(&self) -> Result<GatherReport> {
        let _in_flight = match self.policy {
            ConcurrencyPolicy::Serialize => self.in_flight.lock().await,
            ConcurrencyPolicy::Reject => self.in_flight.try_lock().map_err(|_| {
                warn!("Rejecting gather request: another cycle is in flight");
                GatherError::Busy
            })?,
        };

        let window = GatherWindow::new(self.timeout_limit());
        {
            let mut state = lock(&self.state);
            state.accumulator.clear();
            state.phase = GatherPhase::Connecting;
        }

        self.ensure_connection().await;

        window.elapse().await;

        let mut state = lock(&self.state);
        state.phase = GatherPhase::Resolved;
        let report = GatherReport::from(&state.accumulator);
        info!(
            ips = report.ips.len(),
            ports = report.ports.len(),
            others = report.others.len(),
            "Gathering completed, returning data"
        );
        Ok(report)
    }

    /// 没有活动连接时创建一个；已有连接则直接复用
    async fn ensure_connection(&self) {
        if lock(&self.state).connection.is_some() {
            debug!("Reusing active peer connection");
            return;
        }

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let connection = match self.platform.create_connection(events_tx).await {
            Ok(connection) => connection,
            Err(e) => {
                error!("Failed to create peer connection: {}", e);
                return;
            }
        };

        let id = self.next_connection_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.state).connection = Some(ActiveConnection {
            id,
            handle: Arc::clone(&connection),
        });
        tokio::spawn(pump_events(
            Arc::clone(&self.state),
            id,
            events_rx,
            self.ip_matching,
        ));

        if let Err(e) = connection
            .open_data_channel(&self.data_channel_label)
            .await
        {
            error!("Failed to open data channel: {}", e);
        }

        match connection.negotiate_local_description().await {
            NegotiationOutcome::Started => debug!("Local description negotiation started"),
            NegotiationOutcome::Failed(reason) => error!("Failed to create offer: {}", reason),
        }
    }
}

/// 为一个连接分类候选，收到结束信号后关闭并释放该连接
async fn pump_events(
    state: SharedState,
    connection_id: u64,
    mut events: CandidateReceiver,
    ip_matching: IpMatching,
) {
    while let Some(event) = events.recv().await {
        match event {
            CandidateEvent::Candidate(candidate) => {
                info!("New ICE candidate found: {}", candidate);
                let classification = classify_with(&candidate, ip_matching);
                let mut state = lock(&state);
                state.accumulator.absorb(classification);
                // 窗口结束后迟到的候选不能重新打开本周期
                if matches!(state.phase, GatherPhase::Connecting | GatherPhase::Gathering) {
                    state.phase = GatherPhase::Gathering;
                }
            }
            CandidateEvent::EndOfCandidates => {
                info!("All candidates gathered, closing connection...");
                let finished = {
                    let mut state = lock(&state);
                    if state.phase != GatherPhase::Resolved {
                        state.phase = GatherPhase::Closed;
                    }
                    // 只释放本任务对应的连接
                    let owned = state
                        .connection
                        .as_ref()
                        .is_some_and(|active| active.id == connection_id);
                    if owned { state.connection.take() } else { None }
                };
                if let Some(active) = finished
                    && let Err(e) = active.handle.close().await
                {
                    warn!("Failed to close peer connection: {}", e);
                }
                break;
            }
        }
    }
}
