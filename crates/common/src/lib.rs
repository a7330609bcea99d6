//! ipfinder 基础设施库
//!
//! 为 ipfinder 提供配置加载与通用错误类型

pub mod config;
pub mod error;

// Re-export commonly used types for convenience
pub use config::{
    ConcurrencyPolicy, GatherConfig, IpFinderConfig, IpMatching, LogConfig, ObservabilityConfig,
    TimeoutLimit,
};
pub use error::{ConfigError, Result};
