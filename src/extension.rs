//! Enhanced IP Finder 扩展
//!
//! 对外暴露五个报告操作与一个超时设置命令。每个报告操作都独立触发一次
//! 完整的收集周期，不在调用之间缓存结果。

use crate::error::{Error, Result};
use ice_gather::{GatherReport, GatherSession, IcePlatform, WebRtcPlatform};
use ipfinder_common::{GatherConfig, TimeoutLimit};
use std::sync::Arc;
use tracing::info;

pub const EXTENSION_ID: &str = "enhancedIPAddressExtension";
pub const EXTENSION_NAME: &str = "Enhanced IP Finder";

/// 宿主环境授予扩展的能力
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostEnvironment {
    pub unsandboxed: bool,
}

impl HostEnvironment {
    pub fn unsandboxed() -> Self {
        Self { unsandboxed: true }
    }

    pub fn sandboxed() -> Self {
        Self { unsandboxed: false }
    }
}

pub struct IpFinderExtension {
    session: GatherSession,
}

impl IpFinderExtension {
    /// 沙箱环境下直接失败，扩展不会被注册
    pub fn new(
        host: HostEnvironment,
        platform: Arc<dyn IcePlatform>,
        config: &GatherConfig,
    ) -> Result<Self> {
        if !host.unsandboxed {
            return Err(Error::Sandboxed);
        }

        info!(
            id = EXTENSION_ID,
            timeout = %config.timeout_limit(),
            "{} ready",
            EXTENSION_NAME
        );
        Ok(Self {
            session: GatherSession::new(platform, config),
        })
    }

    /// 使用真实的 WebRTC 平台
    pub fn with_webrtc(host: HostEnvironment, config: &GatherConfig) -> Result<Self> {
        if !host.unsandboxed {
            return Err(Error::Sandboxed);
        }
        let platform = Arc::new(WebRtcPlatform::new()?);
        Self::new(host, platform, config)
    }

    /// 一次收集周期的完整快照
    pub async fn report(&self) -> Result<GatherReport> {
        Ok(self.session.gather().await?)
    }

    pub async fn get_all_ip_addresses(&self) -> Result<String> {
        Ok(self.report().await?.all_ips_joined())
    }

    pub async fn get_ipv4_addresses(&self) -> Result<String> {
        Ok(self.report().await?.ipv4_joined())
    }

    pub async fn get_ipv6_addresses(&self) -> Result<String> {
        Ok(self.report().await?.ipv6_joined())
    }

    pub async fn get_ports(&self) -> Result<String> {
        Ok(self.report().await?.ports_joined())
    }

    pub async fn get_other_candidates(&self) -> Result<String> {
        Ok(self.report().await?.others_joined())
    }

    pub fn set_timeout_limit(&self, value: f64) -> TimeoutLimit {
        self.session.set_timeout_limit(value)
    }
}
