//! 候选收集配置
//!
//! 收集窗口时长、并发策略以及 IP 匹配模式

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 单次收集窗口的时长（秒），始终位于 [1, 60] 区间
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeoutLimit(f64);

impl TimeoutLimit {
    pub const MIN_SECS: f64 = 1.0;
    pub const MAX_SECS: f64 = 60.0;
    pub const DEFAULT_SECS: f64 = 5.0;

    /// 将任意输入钳制到 [1, 60]；NaN 视为下限
    pub fn clamped(secs: f64) -> Self {
        if secs.is_nan() {
            return Self(Self::MIN_SECS);
        }
        Self(secs.clamp(Self::MIN_SECS, Self::MAX_SECS))
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs_f64(self.0)
    }
}

impl Default for TimeoutLimit {
    fn default() -> Self {
        Self(Self::DEFAULT_SECS)
    }
}

impl From<f64> for TimeoutLimit {
    fn from(secs: f64) -> Self {
        Self::clamped(secs)
    }
}

impl fmt::Display for TimeoutLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 同一时刻已有收集在进行时，新请求的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcurrencyPolicy {
    /// 排队，依次执行，每个请求独享完整窗口
    #[default]
    Serialize,
    /// 立即拒绝
    Reject,
}

/// IP 令牌的匹配模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpMatching {
    /// 点分十进制或任意十六进制/冒号串（会误匹配 "ca"、"e:1" 之类片段）
    #[default]
    Permissive,
    /// 仅保留能解析为 `std::net::IpAddr` 的令牌
    Strict,
}

fn default_timeout_secs() -> f64 {
    TimeoutLimit::DEFAULT_SECS
}

/// `[gather]` 配置段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatherConfig {
    /// 收集窗口（秒），超出 [1, 60] 的值在使用时被钳制
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,

    #[serde(default)]
    pub concurrency: ConcurrencyPolicy,

    #[serde(default)]
    pub ip_matching: IpMatching,

    /// 用于触发候选收集的临时数据通道名称
    #[serde(default)]
    pub data_channel_label: String,
}

impl Default for GatherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            concurrency: ConcurrencyPolicy::default(),
            ip_matching: IpMatching::default(),
            data_channel_label: String::new(),
        }
    }
}

impl GatherConfig {
    pub fn timeout_limit(&self) -> TimeoutLimit {
        TimeoutLimit::clamped(self.timeout_secs)
    }

    /// 返回警告信息（以 "Warning:" 开头），钳制本身不是错误
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let limit = self.timeout_limit();
        if limit.as_secs_f64() != self.timeout_secs {
            warnings.push(format!(
                "Warning: gather.timeout_secs = {} is outside [{}, {}], clamped to {}",
                self.timeout_secs,
                TimeoutLimit::MIN_SECS,
                TimeoutLimit::MAX_SECS,
                limit
            ));
        }
        warnings
    }
}
