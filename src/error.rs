//! 统一错误处理模型
//!
//! 提供 ipfinder 的顶层错误类型，聚合各子 crate 与依赖库的错误

use thiserror::Error;

/// 主应用的统一错误枚举
#[derive(Debug, Error)]
pub enum Error {
    // ========== 宿主环境错误 ==========
    /// 宿主未授予完整平台访问权限，扩展拒绝构造
    #[error("Enhanced IP Finder must run unsandboxed")]
    Sandboxed,

    // ========== 配置相关错误 ==========
    /// 配置文件相关错误
    #[error("Configuration error: {0}")]
    Config(#[from] ipfinder_common::ConfigError),

    // ========== 服务相关错误 ==========
    /// 候选收集错误
    #[error("ICE gather error: {0}")]
    Gather(#[from] ice_gather::GatherError),

    // ========== 系统级错误 ==========
    /// I/O 操作错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化/反序列化错误
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    // ========== 业务逻辑错误 ==========
    /// 配置验证失败
    #[error("Configuration validation failed: {message}")]
    Validation { message: String },

    // ========== 通用错误 ==========
    /// 自定义错误消息
    #[error("Application error: {message}")]
    Custom { message: String },
}

/// 统一的 Result 类型
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// 创建自定义错误
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }

    /// 创建配置验证失败错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::custom("test error");
        assert!(matches!(err, Error::Custom { .. }));
    }

    #[test]
    fn test_gather_error_conversion() {
        let err: Error = ice_gather::GatherError::Busy.into();
        assert!(matches!(err, Error::Gather(ice_gather::GatherError::Busy)));
    }

    #[test]
    fn test_sandboxed_message() {
        assert_eq!(
            Error::Sandboxed.to_string(),
            "Enhanced IP Finder must run unsandboxed"
        );
    }
}
