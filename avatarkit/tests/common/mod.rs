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

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use avatarkit::element::{AttachError, PlaybackError};
use avatarkit::prelude::*;
use avatarkit::track::ConstraintError;
use avatarkit_api::ServiceError;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::Instant;

#[derive(Default)]
pub struct CallLog {
    pub display_names: Vec<String>,
    pub joins: Vec<(JoinTarget, JoinOptions)>,
    pub leaves: usize,
    pub polls: Vec<Instant>,
    pub subscriptions: Vec<(ParticipantId, SubscriptionOptions)>,
    pub receive_quality: Vec<(QualityScope, QualityTier)>,
    pub bandwidth: Vec<u32>,
    pub input_settings: Vec<InputSettings>,
    pub audio_enabled: Vec<bool>,
}

/// Scripted call client: each `participants` poll consumes the next entry of
/// the script and keeps returning the last one once the script runs out.
pub struct MockCallClient {
    pub log: Mutex<CallLog>,
    scripted: Mutex<VecDeque<Vec<ParticipantInfo>>>,
    current: Mutex<Vec<ParticipantInfo>>,
    pub fail_join: bool,
}

impl MockCallClient {
    pub fn new(script: Vec<Vec<ParticipantInfo>>) -> Arc<Self> {
        Arc::new(Self {
            log: Mutex::new(CallLog::default()),
            scripted: Mutex::new(script.into()),
            current: Mutex::new(Vec::new()),
            fail_join: false,
        })
    }

    /// A client whose session never contains anyone.
    pub fn empty() -> Arc<Self> {
        Self::new(Vec::new())
    }

    pub fn failing_join() -> Arc<Self> {
        Arc::new(Self {
            log: Mutex::new(CallLog::default()),
            scripted: Mutex::new(VecDeque::new()),
            current: Mutex::new(Vec::new()),
            fail_join: true,
        })
    }

    pub fn poll_count(&self) -> usize {
        self.log.lock().polls.len()
    }
}

#[async_trait]
impl CallClient for MockCallClient {
    fn set_display_name(&self, name: &str) {
        self.log.lock().display_names.push(name.to_owned());
    }

    async fn join(&self, target: &JoinTarget, options: JoinOptions) -> ClientResult<()> {
        self.log.lock().joins.push((target.clone(), options));
        if self.fail_join {
            return Err(ClientError::Join("mock join failure".to_owned()));
        }
        Ok(())
    }

    async fn leave(&self) -> ClientResult<()> {
        self.log.lock().leaves += 1;
        Ok(())
    }

    fn participants(&self) -> Vec<ParticipantInfo> {
        self.log.lock().polls.push(Instant::now());
        if let Some(next) = self.scripted.lock().pop_front() {
            *self.current.lock() = next;
        }
        self.current.lock().clone()
    }

    fn participant(&self, id: &ParticipantId) -> Option<ParticipantInfo> {
        self.current.lock().iter().find(|p| &p.id == id).cloned()
    }

    async fn update_subscription(
        &self,
        id: &ParticipantId,
        options: SubscriptionOptions,
    ) -> ClientResult<()> {
        self.log.lock().subscriptions.push((id.clone(), options));
        Ok(())
    }

    async fn update_receive_quality(
        &self,
        scope: QualityScope,
        tier: QualityTier,
    ) -> ClientResult<()> {
        self.log.lock().receive_quality.push((scope, tier));
        Ok(())
    }

    async fn set_bandwidth_ceiling(&self, kbps: u32) -> ClientResult<()> {
        self.log.lock().bandwidth.push(kbps);
        Ok(())
    }

    async fn update_input_settings(&self, settings: InputSettings) -> ClientResult<()> {
        self.log.lock().input_settings.push(settings);
        Ok(())
    }

    async fn set_local_audio_enabled(&self, enabled: bool) -> ClientResult<()> {
        self.log.lock().audio_enabled.push(enabled);
        Ok(())
    }
}

/// Session provider answering from a canned result.
pub struct MockProvider {
    target: Option<String>,
    status: u16,
    pub calls: AtomicUsize,
}

impl MockProvider {
    pub fn ok(target: &str) -> Arc<Self> {
        Arc::new(Self { target: Some(target.to_owned()), status: 200, calls: AtomicUsize::new(0) })
    }

    pub fn http_error(status: u16) -> Arc<Self> {
        Arc::new(Self { target: None, status, calls: AtomicUsize::new(0) })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProvider for MockProvider {
    async fn create_session(
        &self,
        request: &SessionRequest,
    ) -> Result<RemoteSession, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.target {
            Some(target) => Ok(RemoteSession {
                id: Some(SessionId::from(format!("session-{}", request.face_id))),
                join_target: JoinTarget::from(target.clone()),
            }),
            None => Err(ServiceError::Api {
                status: self.status,
                message: "mock service failure".to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintMode {
    Accept,
    RejectIdeal,
    RejectAll,
}

pub struct MockSource {
    id: TrackId,
    mode: ConstraintMode,
    pub applied: Mutex<Vec<VideoConstraints>>,
    pub current: Mutex<SourceSettings>,
}

impl MockSource {
    pub fn new(id: &str) -> Arc<Self> {
        Self::with_mode(id, ConstraintMode::Accept)
    }

    pub fn with_mode(id: &str, mode: ConstraintMode) -> Arc<Self> {
        Arc::new(Self {
            id: TrackId::from(id),
            mode,
            applied: Mutex::new(Vec::new()),
            current: Mutex::new(SourceSettings::default()),
        })
    }

    pub fn set_settings(&self, width: u32, height: u32, frame_rate: f64) {
        *self.current.lock() = SourceSettings { width, height, frame_rate };
    }

    pub fn applied_count(&self) -> usize {
        self.applied.lock().len()
    }
}

#[async_trait]
impl MediaSource for MockSource {
    fn id(&self) -> TrackId {
        self.id.clone()
    }

    async fn apply_constraints(
        &self,
        constraints: &VideoConstraints,
    ) -> Result<(), ConstraintError> {
        let attempts = {
            let mut applied = self.applied.lock();
            applied.push(*constraints);
            applied.len()
        };
        match self.mode {
            ConstraintMode::Accept => Ok(()),
            ConstraintMode::RejectAll => {
                Err(ConstraintError::Rejected("overconstrained".to_owned()))
            }
            ConstraintMode::RejectIdeal if attempts == 1 => {
                Err(ConstraintError::Rejected("overconstrained".to_owned()))
            }
            ConstraintMode::RejectIdeal => Ok(()),
        }
    }

    fn settings(&self) -> SourceSettings {
        *self.current.lock()
    }
}

pub struct MockElement {
    pub assigned: Mutex<Option<MediaStream>>,
    pub set_source_calls: AtomicUsize,
    pub play_calls: AtomicUsize,
    pub fail_set_source: bool,
    pub fail_play: bool,
    dimensions: Mutex<(u32, u32)>,
    ready: Mutex<ReadyState>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<ElementEvent>>>,
}

impl MockElement {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::build())
    }

    pub fn unmounted() -> Arc<Self> {
        let mut element = Self::build();
        element.fail_set_source = true;
        Arc::new(element)
    }

    pub fn autoplay_blocked() -> Arc<Self> {
        let mut element = Self::build();
        element.fail_play = true;
        Arc::new(element)
    }

    fn build() -> Self {
        Self {
            assigned: Mutex::new(None),
            set_source_calls: AtomicUsize::new(0),
            play_calls: AtomicUsize::new(0),
            fail_set_source: false,
            fail_play: false,
            dimensions: Mutex::new((0, 0)),
            ready: Mutex::new(ReadyState::HaveNothing),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn set_dimensions(&self, width: u32, height: u32) {
        *self.dimensions.lock() = (width, height);
    }

    pub fn set_ready(&self, state: ReadyState) {
        *self.ready.lock() = state;
    }

    pub fn emit(&self, event: ElementEvent) {
        for subscriber in self.subscribers.lock().iter() {
            let _ = subscriber.send(event);
        }
    }

    pub fn set_source_count(&self) -> usize {
        self.set_source_calls.load(Ordering::SeqCst)
    }

    pub fn play_count(&self) -> usize {
        self.play_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaElement for MockElement {
    fn set_source(&self, stream: Option<MediaStream>) -> Result<(), AttachError> {
        self.set_source_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_set_source {
            return Err(AttachError::NotMounted);
        }
        *self.assigned.lock() = stream;
        Ok(())
    }

    async fn play(&self) -> Result<(), PlaybackError> {
        self.play_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_play {
            return Err(PlaybackError::Rejected("autoplay blocked".to_owned()));
        }
        Ok(())
    }

    fn video_dimensions(&self) -> (u32, u32) {
        *self.dimensions.lock()
    }

    fn ready_state(&self) -> ReadyState {
        *self.ready.lock()
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<ElementEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().push(tx);
        rx
    }
}

/// A remote participant snapshot with live video and audio tracks.
pub fn bot_participant(id: &str, name: &str) -> ParticipantInfo {
    let video_source = MockSource::new(&format!("{id}-video"));
    video_source.set_settings(1920, 1080, 30.0);
    let audio_source = MockSource::new(&format!("{id}-audio"));
    ParticipantInfo {
        id: ParticipantId::from(id),
        name: name.to_owned(),
        is_local: false,
        tracks: ParticipantTracks {
            video: Some(TrackHandle {
                id: TrackId::from(format!("{id}-video")),
                kind: TrackKind::Video,
                state: TrackState::Playable,
                source: video_source.clone(),
                persistent: Some(video_source),
            }),
            audio: Some(TrackHandle {
                id: TrackId::from(format!("{id}-audio")),
                kind: TrackKind::Audio,
                state: TrackState::Playable,
                source: audio_source.clone(),
                persistent: Some(audio_source),
            }),
        },
    }
}

pub fn video_handle(id: &str, source: Arc<MockSource>) -> TrackHandle {
    TrackHandle {
        id: TrackId::from(id),
        kind: TrackKind::Video,
        state: TrackState::Playable,
        source: source.clone(),
        persistent: Some(source),
    }
}

pub fn audio_handle(id: &str, source: Arc<MockSource>, persistent: bool) -> TrackHandle {
    let persistent_source: Option<Arc<dyn MediaSource>> =
        if persistent { Some(source.clone()) } else { None };
    TrackHandle {
        id: TrackId::from(id),
        kind: TrackKind::Audio,
        state: TrackState::Playable,
        source,
        persistent: persistent_source,
    }
}
