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
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::client::VideoConstraints;
use super::id::TrackId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

/// Delivery state of a remote track as reported by the call client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Loading,
    Playable,
    Off,
}

#[derive(Debug, Error)]
pub enum ConstraintError {
    #[error("constraints rejected by the source: {0}")]
    Rejected(String),
    #[error("source does not support constraints")]
    Unsupported,
}

/// Measured settings of a live media source.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SourceSettings {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}

/// A live media source owned by the call SDK. Constraint application is
/// best-effort; `settings` reflects whatever the source currently delivers.
#[async_trait]
pub trait MediaSource: Send + Sync {
    fn id(&self) -> TrackId;

    async fn apply_constraints(&self, constraints: &VideoConstraints)
        -> Result<(), ConstraintError>;

    fn settings(&self) -> SourceSettings;
}

/// A single-source stream assignable to a media element.
#[derive(Clone)]
pub struct MediaStream {
    source: Arc<dyn MediaSource>,
}

impl MediaStream {
    pub fn single(source: Arc<dyn MediaSource>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Arc<dyn MediaSource> {
        &self.source
    }
}

impl Debug for MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStream").field("source", &self.source.id()).finish()
    }
}

/// Reference to one live track published by a remote participant. The handle
/// is a snapshot; its lifetime is bound to the remote publication and this
/// crate only ever attaches or detaches it.
#[derive(Clone)]
pub struct TrackHandle {
    pub id: TrackId,
    pub kind: TrackKind,
    pub state: TrackState,
    /// Live reference. Some SDKs swap this on renegotiation.
    pub source: Arc<dyn MediaSource>,
    /// Stable reference surviving renegotiation, preferred for attachment
    /// when present.
    pub persistent: Option<Arc<dyn MediaSource>>,
}

impl TrackHandle {
    /// The source to build a stream from: the persistent reference if the SDK
    /// provides one, else the live reference.
    pub fn preferred_source(&self) -> Arc<dyn MediaSource> {
        self.persistent.clone().unwrap_or_else(|| self.source.clone())
    }
}

impl Debug for TrackHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackHandle")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("persistent", &self.persistent.is_some())
            .finish()
    }
}
