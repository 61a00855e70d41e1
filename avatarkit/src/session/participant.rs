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

use std::fmt::Debug;

use super::id::ParticipantId;
use super::track::TrackHandle;

/// Track handles currently published by a participant.
#[derive(Clone, Debug, Default)]
pub struct ParticipantTracks {
    pub video: Option<TrackHandle>,
    pub audio: Option<TrackHandle>,
}

/// Read-only snapshot of a participant, supplied by the call client.
/// Discovery looks participants up by `name`; nothing here is owned by this
/// crate.
#[derive(Clone)]
pub struct ParticipantInfo {
    pub id: ParticipantId,
    pub name: String,
    pub is_local: bool,
    pub tracks: ParticipantTracks,
}

impl Debug for ParticipantInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticipantInfo")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("is_local", &self.is_local)
            .finish()
    }
}
