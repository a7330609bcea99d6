//! # ipfinder
//!
//! 通过 WebRTC ICE 候选收集发现本机网络端点信息

pub mod error;
pub mod extension;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extension::{EXTENSION_ID, EXTENSION_NAME, HostEnvironment, IpFinderExtension};
pub use ipfinder_common::config::IpFinderConfig;
