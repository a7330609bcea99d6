//! ICE 候选收集
//!
//! 通过 WebRTC 本地协商触发 ICE 候选枚举，在固定窗口内收集候选，
//! 并把每条候选拆分为 IP、端口与其他令牌。

pub mod accumulator;
pub mod classifier;
pub mod error;
pub mod platform;
pub mod report;
pub mod session;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

// Re-export types for convenience
pub use classifier::{Classification, classify, classify_with};
pub use error::{GatherError, Result};
pub use platform::{
    CandidateEvent, CandidateSender, IcePlatform, NegotiationConnection, NegotiationOutcome,
    WebRtcPlatform,
};
pub use report::{GatherReport, JOIN_SEPARATOR};
pub use session::{GatherPhase, GatherSession, GatherWindow};
