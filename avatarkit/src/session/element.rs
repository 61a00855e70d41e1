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

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::track::MediaStream;

/// How much of the media resource the element has buffered, mirroring the
/// small enumerated code playback surfaces report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    #[default]
    HaveNothing,
    HaveMetadata,
    HaveCurrentData,
    HaveFutureData,
    HaveEnoughData,
}

impl ReadyState {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl From<u8> for ReadyState {
    fn from(value: u8) -> Self {
        match value {
            0 => ReadyState::HaveNothing,
            1 => ReadyState::HaveMetadata,
            2 => ReadyState::HaveCurrentData,
            3 => ReadyState::HaveFutureData,
            _ => ReadyState::HaveEnoughData,
        }
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReadyState::HaveNothing => "HAVE_NOTHING",
            ReadyState::HaveMetadata => "HAVE_METADATA",
            ReadyState::HaveCurrentData => "HAVE_CURRENT_DATA",
            ReadyState::HaveFutureData => "HAVE_FUTURE_DATA",
            ReadyState::HaveEnoughData => "HAVE_ENOUGH_DATA",
        };
        f.write_str(label)
    }
}

/// Playback lifecycle notifications from a media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementEvent {
    MetadataLoaded,
    CanPlay,
    Playing,
}

#[derive(Debug, Error)]
pub enum AttachError {
    #[error("element is not mounted")]
    NotMounted,
    #[error("element rejected the stream: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("playback rejected: {0}")]
    Rejected(String),
}

/// A mounted media-rendering element. The attachment logic assigns a stream,
/// starts playback, and reads dimensions/ready state back for diagnostics;
/// rendering itself stays on the other side of this trait.
#[async_trait]
pub trait MediaElement: Send + Sync {
    /// Assign (or clear) the playback source.
    fn set_source(&self, stream: Option<MediaStream>) -> Result<(), AttachError>;

    /// Explicitly start playback. Autoplay policies can reject this.
    async fn play(&self) -> Result<(), PlaybackError>;

    /// Current rendered dimensions; (0, 0) until frames arrive.
    fn video_dimensions(&self) -> (u32, u32);

    fn ready_state(&self) -> ReadyState;

    /// Subscribe to playback lifecycle events. Dropping the receiver is how a
    /// listener is removed.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<ElementEvent>;
}
