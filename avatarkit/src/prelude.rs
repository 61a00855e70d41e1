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

pub use crate::attachment::{MediaAttachment, StatsSample};

pub use crate::client::{
    CallClient, ClientError, ClientResult, InputSettings, JoinOptions, JoinTarget, QualityScope,
    QualityTier, SendEncodings, SubscriptionOptions, VideoConstraints, VideoEncoding,
    VideoProcessor,
};

pub use crate::controller::{AvatarSession, SessionConfig, DEFAULT_BOT_NAME};

pub use crate::element::{ElementEvent, MediaElement, ReadyState};

pub use crate::participant::{ParticipantInfo, ParticipantTracks};

pub use crate::provider::{RemoteSession, SessionProvider, SessionRequest};

pub use crate::track::{
    MediaSource, MediaStream, SourceSettings, TrackHandle, TrackKind, TrackState,
};

pub use crate::view::AvatarView;

pub use crate::{
    SessionError, SessionEvent, SessionEvents, SessionResult, SessionStatus,
};

pub use crate::id::*;
