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

use std::sync::Arc;

use super::attachment::{MediaAttachment, StatsSample};
use super::element::MediaElement;
use super::participant::ParticipantTracks;
use super::track::TrackKind;

/// One rendered avatar: a video and an audio attachment bound as a pair.
/// Rebinding with the same track handles is a no-op; the per-kind identity
/// guards live in [`MediaAttachment`].
pub struct AvatarView {
    video: MediaAttachment,
    audio: MediaAttachment,
}

impl AvatarView {
    pub fn new(video_element: Arc<dyn MediaElement>, audio_element: Arc<dyn MediaElement>) -> Self {
        Self {
            video: MediaAttachment::new(video_element, TrackKind::Video),
            audio: MediaAttachment::new(audio_element, TrackKind::Audio),
        }
    }

    /// Bind whatever tracks the participant currently publishes. Call again
    /// whenever the handles change; only changed identities rebind.
    pub async fn bind(&self, tracks: &ParticipantTracks) {
        if let Some(video) = &tracks.video {
            self.video.attach(video).await;
        }
        if let Some(audio) = &tracks.audio {
            self.audio.attach(audio).await;
        }
    }

    /// Detach both attachments, cancelling their samplers and listeners.
    pub fn unbind(&self) {
        self.video.detach();
        self.audio.detach();
    }

    /// Diagnostics of the video stream for the stats overlay.
    pub fn video_stats(&self) -> StatsSample {
        self.video.stats()
    }

    pub fn video(&self) -> &MediaAttachment {
        &self.video
    }

    pub fn audio(&self) -> &MediaAttachment {
        &self.audio
    }
}
