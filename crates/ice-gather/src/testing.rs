//! 脚本化的模拟协商平台
//!
//! 每创建一个连接就取出一段脚本；协商开始后按脚本依次送出事件。

use crate::error::{GatherError, Result};
use crate::platform::{
    CandidateEvent, CandidateSender, IcePlatform, NegotiationConnection, NegotiationOutcome,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 脚本中的一步
#[derive(Debug, Clone)]
pub enum ScriptStep {
    Emit(CandidateEvent),
    Delay(Duration),
}

impl ScriptStep {
    pub fn candidate(candidate: impl Into<String>) -> Self {
        Self::Emit(CandidateEvent::Candidate(candidate.into()))
    }

    pub fn end() -> Self {
        Self::Emit(CandidateEvent::EndOfCandidates)
    }

    pub fn delay_ms(ms: u64) -> Self {
        Self::Delay(Duration::from_millis(ms))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureMode {
    None,
    Creation,
    Negotiation,
}

/// 模拟平台
pub struct ScriptedPlatform {
    scripts: Mutex<VecDeque<Vec<ScriptStep>>>,
    failure: FailureMode,
    created: AtomicUsize,
    closed: Arc<AtomicUsize>,
    labels: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPlatform {
    /// 依次为每个新连接提供一段脚本；脚本用完后的连接不产生任何事件
    pub fn new(scripts: Vec<Vec<ScriptStep>>) -> Self {
        Self::with_failure(scripts, FailureMode::None)
    }

    /// 本地协商总是失败
    pub fn failing_negotiation() -> Self {
        Self::with_failure(Vec::new(), FailureMode::Negotiation)
    }

    /// 连接创建总是失败
    pub fn failing_creation() -> Self {
        Self::with_failure(Vec::new(), FailureMode::Creation)
    }

    fn with_failure(scripts: Vec<Vec<ScriptStep>>, failure: FailureMode) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            failure,
            created: AtomicUsize::new(0),
            closed: Arc::new(AtomicUsize::new(0)),
            labels: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn connections_created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn connections_closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// 所有已打开数据通道的名称
    pub fn data_channel_labels(&self) -> Vec<String> {
        self.labels.lock().expect("labels poisoned").clone()
    }
}

#[async_trait]
impl IcePlatform for ScriptedPlatform {
    async fn create_connection(
        &self,
        events: CandidateSender,
    ) -> Result<Arc<dyn NegotiationConnection>> {
        if self.failure == FailureMode::Creation {
            return Err(GatherError::ConnectionCreateFailed {
                reason: "scripted creation failure".to_string(),
            });
        }

        self.created.fetch_add(1, Ordering::SeqCst);
        let script = self
            .scripts
            .lock()
            .expect("scripts poisoned")
            .pop_front()
            .unwrap_or_default();

        Ok(Arc::new(ScriptedConnection {
            events,
            script,
            fail_negotiation: self.failure == FailureMode::Negotiation,
            closed: Arc::clone(&self.closed),
            labels: Arc::clone(&self.labels),
        }))
    }
}

struct ScriptedConnection {
    events: CandidateSender,
    script: Vec<ScriptStep>,
    fail_negotiation: bool,
    closed: Arc<AtomicUsize>,
    labels: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl NegotiationConnection for ScriptedConnection {
    async fn open_data_channel(&self, label: &str) -> Result<()> {
        self.labels
            .lock()
            .expect("labels poisoned")
            .push(label.to_string());
        Ok(())
    }

    async fn negotiate_local_description(&self) -> NegotiationOutcome {
        if self.fail_negotiation {
            return NegotiationOutcome::Failed("scripted negotiation failure".to_string());
        }

        let events = self.events.clone();
        let script = self.script.clone();
        tokio::spawn(async move {
            for step in script {
                match step {
                    ScriptStep::Delay(d) => tokio::time::sleep(d).await,
                    ScriptStep::Emit(event) => {
                        if events.send(event).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        NegotiationOutcome::Started
    }

    async fn close(&self) -> Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
