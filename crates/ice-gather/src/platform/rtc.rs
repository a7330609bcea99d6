//! 基于 webrtc crate 的协商平台

use super::{CandidateEvent, CandidateSender, IcePlatform, NegotiationConnection, NegotiationOutcome};
use crate::error::{GatherError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::{API, APIBuilder};
use webrtc::ice_transport::ice_candidate::RTCIceCandidate;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;

/// 使用 `RTCPeerConnection` 枚举本机候选
pub struct WebRtcPlatform {
    api: API,
}

impl WebRtcPlatform {
    pub fn new() -> Result<Self> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;

        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        Ok(Self { api })
    }
}

#[async_trait]
impl IcePlatform for WebRtcPlatform {
    async fn create_connection(
        &self,
        events: CandidateSender,
    ) -> Result<Arc<dyn NegotiationConnection>> {
        // 空服务器列表：只会产生 host 候选
        let config = RTCConfiguration {
            ice_servers: vec![],
            ..Default::default()
        };

        let peer_connection = self.api.new_peer_connection(config).await.map_err(|e| {
            GatherError::ConnectionCreateFailed {
                reason: e.to_string(),
            }
        })?;

        peer_connection.on_ice_candidate(Box::new(move |candidate: Option<RTCIceCandidate>| {
            let events = events.clone();
            Box::pin(async move {
                let event = match candidate {
                    Some(candidate) => match candidate.to_json() {
                        Ok(init) => CandidateEvent::Candidate(init.candidate),
                        Err(e) => {
                            warn!("Failed to serialize ICE candidate: {}", e);
                            return;
                        }
                    },
                    None => CandidateEvent::EndOfCandidates,
                };
                // 接收端已退出说明会话不再关心该连接
                if events.send(event).is_err() {
                    debug!("Candidate receiver dropped, discarding event");
                }
            })
        }));

        Ok(Arc::new(WebRtcConnection {
            peer_connection: Arc::new(peer_connection),
        }))
    }
}

struct WebRtcConnection {
    peer_connection: Arc<RTCPeerConnection>,
}

#[async_trait]
impl NegotiationConnection for WebRtcConnection {
    async fn open_data_channel(&self, label: &str) -> Result<()> {
        self.peer_connection
            .create_data_channel(label, None)
            .await
            .map_err(|e| GatherError::DataChannelFailed {
                label: label.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn negotiate_local_description(&self) -> NegotiationOutcome {
        let offer = match self.peer_connection.create_offer(None).await {
            Ok(offer) => offer,
            Err(e) => return NegotiationOutcome::Failed(e.to_string()),
        };

        match self.peer_connection.set_local_description(offer).await {
            Ok(()) => NegotiationOutcome::Started,
            Err(e) => NegotiationOutcome::Failed(e.to_string()),
        }
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection
            .close()
            .await
            .map_err(|e| GatherError::CloseFailed {
                reason: e.to_string(),
            })
    }
}
