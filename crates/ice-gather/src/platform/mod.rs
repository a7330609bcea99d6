//! 协商平台抽象
//!
//! 候选收集只依赖这里的两个 trait：`IcePlatform` 负责创建连接，
//! `NegotiationConnection` 负责打开数据通道、发起本地协商与关闭。
//! 真实实现见 [`WebRtcPlatform`]，测试使用脚本化的模拟平台。

mod rtc;

pub use rtc::WebRtcPlatform;

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// 平台送出的候选事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateEvent {
    /// 一条原始候选字符串
    Candidate(String),
    /// 候选枚举结束
    EndOfCandidates,
}

pub type CandidateSender = mpsc::UnboundedSender<CandidateEvent>;
pub type CandidateReceiver = mpsc::UnboundedReceiver<CandidateEvent>;

/// 本地描述协商的结果
///
/// 失败只会被记录，不会传给调用方。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiationOutcome {
    Started,
    Failed(String),
}

impl NegotiationOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started)
    }
}

/// 可以创建协商连接的平台
#[async_trait]
pub trait IcePlatform: Send + Sync {
    /// 创建一个不带任何 ICE 服务器的连接，候选事件写入 `events`
    async fn create_connection(
        &self,
        events: CandidateSender,
    ) -> Result<Arc<dyn NegotiationConnection>>;
}

/// 一个协商连接；只用于枚举候选，从不真正连到对端
#[async_trait]
pub trait NegotiationConnection: Send + Sync {
    /// 打开一个临时数据通道，平台只有在存在通道或轨道时才会开始收集候选
    async fn open_data_channel(&self, label: &str) -> Result<()>;

    /// 生成 offer 并设为本地描述
    async fn negotiate_local_description(&self) -> NegotiationOutcome;

    async fn close(&self) -> Result<()>;
}
