// Copyright 2026 AvatarKit Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use thiserror::Error;

use super::id::ParticipantId;
use super::participant::ParticipantInfo;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("join failed: {0}")]
    Join(String),
    #[error("client command failed: {0}")]
    Command(String),
    #[error("not connected to a session")]
    NotConnected,
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Opaque join target returned by the session service, usually a room URL.
#[derive(Clone, Default, Debug, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct JoinTarget(pub String);

impl From<String> for JoinTarget {
    fn from(str: String) -> JoinTarget {
        JoinTarget(str)
    }
}

impl std::fmt::Display for JoinTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One outbound simulcast encoding tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoEncoding {
    pub max_bitrate: u64,
    pub scale_resolution_down_by: f32,
    pub max_framerate: u32,
}

/// The three encoding tiers offered to the session when publishing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SendEncodings {
    pub low: VideoEncoding,
    pub medium: VideoEncoding,
    pub high: VideoEncoding,
}

impl Default for SendEncodings {
    fn default() -> Self {
        Self {
            low: VideoEncoding {
                max_bitrate: 300_000,
                scale_resolution_down_by: 4.0,
                max_framerate: 15,
            },
            medium: VideoEncoding {
                max_bitrate: 1_000_000,
                scale_resolution_down_by: 2.0,
                max_framerate: 30,
            },
            high: VideoEncoding {
                max_bitrate: 2_500_000,
                scale_resolution_down_by: 1.0,
                max_framerate: 30,
            },
        }
    }
}

/// Capture constraints applied to a video source. Ideal values are targets,
/// not guarantees; min values reject sources below the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub ideal_frame_rate: u32,
    pub min_width: Option<u32>,
    pub min_height: Option<u32>,
}

impl VideoConstraints {
    pub fn ideal(width: u32, height: u32, frame_rate: u32) -> Self {
        Self {
            ideal_width: width,
            ideal_height: height,
            ideal_frame_rate: frame_rate,
            min_width: None,
            min_height: None,
        }
    }

    pub fn with_min(mut self, width: u32, height: u32) -> Self {
        self.min_width = Some(width);
        self.min_height = Some(height);
        self
    }
}

/// Video post-processing applied by the SDK to an inbound stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoProcessor {
    None,
}

/// Input-settings update; unset fields are left untouched by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSettings {
    pub constraints: Option<VideoConstraints>,
    pub processor: Option<VideoProcessor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinOptions {
    /// This client is a passive viewer; both stay false in practice.
    pub publish_video: bool,
    pub publish_audio: bool,
    /// Prepared outbound tiers, unused while publishing is disabled.
    pub send_encodings: SendEncodings,
    pub input_settings: InputSettings,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            publish_video: false,
            publish_audio: false,
            send_encodings: SendEncodings::default(),
            input_settings: InputSettings::default(),
        }
    }
}

/// Preset inbound quality tier of a simulcasted publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

impl QualityTier {
    /// Encoding layer index as understood by the call SDK.
    pub fn layer(&self) -> u8 {
        *self as u8
    }
}

/// Target of a receive-quality update: one participant or everyone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualityScope {
    All,
    Participant(ParticipantId),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriptionOptions {
    pub subscribed: bool,
}

/// The surface of the external call SDK this crate consumes. The session
/// controller is the only owner; discovery and attachment see it as a shared
/// read/command handle and never create or destroy it.
#[async_trait]
pub trait CallClient: Send + Sync {
    fn set_display_name(&self, name: &str);

    async fn join(&self, target: &JoinTarget, options: JoinOptions) -> ClientResult<()>;

    async fn leave(&self) -> ClientResult<()>;

    /// Snapshot of the participants currently in the session.
    fn participants(&self) -> Vec<ParticipantInfo>;

    fn participant(&self, id: &ParticipantId) -> Option<ParticipantInfo>;

    async fn update_subscription(
        &self,
        id: &ParticipantId,
        options: SubscriptionOptions,
    ) -> ClientResult<()>;

    async fn update_receive_quality(
        &self,
        scope: QualityScope,
        tier: QualityTier,
    ) -> ClientResult<()>;

    async fn set_bandwidth_ceiling(&self, kbps: u32) -> ClientResult<()>;

    async fn update_input_settings(&self, settings: InputSettings) -> ClientResult<()>;

    async fn set_local_audio_enabled(&self, enabled: bool) -> ClientResult<()>;
}
