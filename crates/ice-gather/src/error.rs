//! ICE 收集错误类型
//!
//! 协商失败不会经由这些类型抛给调用方，而是作为 `NegotiationOutcome::Failed`
//! 记录后吞掉；这里只有平台调用失败与并发拒绝。

use thiserror::Error;

/// ICE 收集错误枚举
#[derive(Error, Debug)]
pub enum GatherError {
    // ========== 并发错误 ==========
    /// 已有收集正在进行（拒绝策略下）
    #[error("A gather cycle is already in flight")]
    Busy,

    // ========== 平台错误 ==========
    /// 连接对象创建失败
    #[error("Failed to create peer connection: {reason}")]
    ConnectionCreateFailed { reason: String },

    /// 数据通道创建失败
    #[error("Failed to open data channel '{label}': {reason}")]
    DataChannelFailed { label: String, reason: String },

    /// 连接关闭失败
    #[error("Failed to close peer connection: {reason}")]
    CloseFailed { reason: String },

    // ========== 外部错误包装 ==========
    /// WebRTC 库错误
    #[error("WebRTC error: {0}")]
    WebRtc(#[from] webrtc::Error),
}

/// ICE 收集专用的 Result 类型
pub type Result<T> = std::result::Result<T, GatherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_message() {
        assert_eq!(
            GatherError::Busy.to_string(),
            "A gather cycle is already in flight"
        );
    }

    #[test]
    fn test_data_channel_error_names_label() {
        let err = GatherError::DataChannelFailed {
            label: "ipfinder".to_string(),
            reason: "closed".to_string(),
        };
        assert!(err.to_string().contains("'ipfinder'"));
        assert!(err.to_string().contains("closed"));
    }
}
