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

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::client::{CallClient, InputSettings, JoinOptions, JoinTarget, QualityScope, QualityTier, VideoConstraints};
use super::discovery;
use super::id::SessionId;
use super::participant::ParticipantInfo;
use super::provider::{SessionProvider, SessionRequest};
use super::{SessionEmitter, SessionError, SessionEvent, SessionEvents, SessionResult, SessionStatus};

/// Well-known display name of the avatar participant.
pub const DEFAULT_BOT_NAME: &str = "Chatbot";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Avatar face identifier; required before `join`.
    pub face_id: String,
    pub voice_id: String,
    pub first_message: String,
    pub system_prompt: String,
    /// Participant name discovery matches on, exact and case-sensitive.
    pub bot_name: String,
    pub display_name: String,
    pub poll_interval: Duration,
    pub bandwidth_kbps: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            face_id: String::new(),
            voice_id: String::new(),
            first_message: String::new(),
            system_prompt: String::new(),
            bot_name: DEFAULT_BOT_NAME.to_owned(),
            display_name: "User".to_owned(),
            poll_interval: Duration::from_millis(500),
            bandwidth_kbps: 2500,
        }
    }
}

struct DiscoveryTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

struct SessionInner {
    status: AtomicU8,
    loading: AtomicBool,
    avatar_visible: AtomicBool,
    microphone_enabled: AtomicBool,
    config: SessionConfig,
    provider: Arc<dyn SessionProvider>,
    client: Arc<dyn CallClient>,
    session_id: Mutex<Option<SessionId>>,
    join_target: Mutex<Option<JoinTarget>>,
    bot: Mutex<Option<ParticipantInfo>>,
    discovery: Mutex<Option<DiscoveryTask>>,
    emitter: SessionEmitter,
}

/// The session lifecycle controller. Owns the call client exclusively:
/// discovery and attachments only ever see it as a shared read/command
/// handle handed out here.
///
/// `Idle → Joining → Joined → Discovering → Active → Leaving → Left`,
/// with a failed join falling back to `Idle` and `join` accepted again from
/// `Left`.
pub struct AvatarSession {
    inner: Arc<SessionInner>,
}

impl AvatarSession {
    pub fn new(
        provider: Arc<dyn SessionProvider>,
        client: Arc<dyn CallClient>,
        config: SessionConfig,
    ) -> (Self, SessionEvents) {
        let (emitter, events) = mpsc::unbounded_channel();
        let inner = Arc::new(SessionInner {
            status: AtomicU8::new(SessionStatus::Idle as u8),
            loading: AtomicBool::new(false),
            avatar_visible: AtomicBool::new(false),
            microphone_enabled: AtomicBool::new(false),
            config,
            provider,
            client,
            session_id: Default::default(),
            join_target: Default::default(),
            bot: Default::default(),
            discovery: Default::default(),
            emitter,
        });
        (Self { inner }, events)
    }

    pub fn status(&self) -> SessionStatus {
        self.inner.status()
    }

    /// True from the join request until the avatar stream becomes active or
    /// the join aborts.
    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::Acquire)
    }

    pub fn is_avatar_visible(&self) -> bool {
        self.inner.avatar_visible.load(Ordering::Acquire)
    }

    pub fn is_microphone_enabled(&self) -> bool {
        self.inner.microphone_enabled.load(Ordering::Acquire)
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.inner.session_id.lock().clone()
    }

    /// The opaque join target of the current remote session.
    pub fn join_target(&self) -> Option<JoinTarget> {
        self.inner.join_target.lock().clone()
    }

    /// The discovered avatar participant once the session is `Active`.
    pub fn bot_participant(&self) -> Option<ParticipantInfo> {
        self.inner.bot.lock().clone()
    }

    /// Create the remote session, join the call as a passive viewer and start
    /// discovery. On failure the session is back at `Idle` with the loading
    /// flag cleared.
    pub async fn join(&self) -> SessionResult<()> {
        self.inner.join().await
    }

    /// Leave the call and release every session resource. A no-op (beyond a
    /// log line) when no call is active; `Closed` fires only when an active
    /// call was actually left.
    pub async fn leave(&self) {
        self.inner.leave().await;
    }

    /// Force-disable the local microphone. Never toggles: muting twice keeps
    /// the microphone off.
    pub async fn mute(&self) {
        self.inner.set_microphone_enabled(false).await;
    }

    pub async fn unmute(&self) {
        self.inner.set_microphone_enabled(true).await;
    }

    pub async fn set_microphone_enabled(&self, enabled: bool) {
        self.inner.set_microphone_enabled(enabled).await;
    }
}

impl Drop for AvatarSession {
    fn drop(&mut self) {
        self.inner.cancel_discovery();
    }
}

impl SessionInner {
    fn status(&self) -> SessionStatus {
        self.status.load(Ordering::Acquire).into()
    }

    /// Change the lifecycle state and emit an event. Does nothing if the
    /// state is already the same.
    fn update_status(&self, status: SessionStatus) -> bool {
        let old = self.status.swap(status as u8, Ordering::AcqRel);
        if old == status as u8 {
            return false;
        }
        let _ = self.emitter.send(SessionEvent::StatusChanged(status));
        true
    }

    fn is_joined(&self) -> bool {
        matches!(
            self.status(),
            SessionStatus::Joined | SessionStatus::Discovering | SessionStatus::Active
        )
    }

    async fn join(self: &Arc<Self>) -> SessionResult<()> {
        let status = self.status();
        if !matches!(status, SessionStatus::Idle | SessionStatus::Left) {
            log::warn!("join attempted while session is {:?}", status);
            return Err(SessionError::NotIdle(status));
        }
        if self.config.face_id.trim().is_empty() {
            return Err(SessionError::InvalidConfig("face id is empty".to_owned()));
        }

        self.update_status(SessionStatus::Joining);
        self.loading.store(true, Ordering::Release);

        let request = SessionRequest {
            face_id: self.config.face_id.clone(),
            voice_id: self.config.voice_id.clone(),
            first_message: self.config.first_message.clone(),
            system_prompt: self.config.system_prompt.clone(),
        };
        let remote = match self.provider.create_session(&request).await {
            Ok(remote) => remote,
            Err(err) => {
                log::error!("session creation failed: {}", err);
                self.abort_join();
                return Err(err.into());
            }
        };
        log::info!("created session, join target: {}", remote.join_target);
        *self.session_id.lock() = remote.id.clone();
        *self.join_target.lock() = Some(remote.join_target.clone());

        self.client.set_display_name(&self.config.display_name);

        // Passive viewer: nothing is published, the encoding tiers are only
        // prepared in case publishing is ever enabled.
        let options = JoinOptions {
            publish_video: false,
            publish_audio: false,
            send_encodings: Default::default(),
            input_settings: InputSettings {
                constraints: Some(VideoConstraints::ideal(1920, 1080, 30).with_min(1280, 720)),
                processor: None,
            },
        };
        if let Err(err) = self.client.join(&remote.join_target, options).await {
            log::error!("failed to join the call: {}", err);
            self.abort_join();
            return Err(err.into());
        }
        self.update_status(SessionStatus::Joined);
        self.microphone_enabled.store(false, Ordering::Release);

        self.tune_receive_path().await;

        self.update_status(SessionStatus::Discovering);
        self.spawn_discovery();
        Ok(())
    }

    /// Post-join, ask the session for the best the publisher can deliver.
    /// All advisory: failures are logged and the session stays joined.
    async fn tune_receive_path(&self) {
        if let Err(err) =
            self.client.update_receive_quality(QualityScope::All, QualityTier::High).await
        {
            log::warn!("failed to raise receive quality: {}", err);
        }
        if let Err(err) = self.client.set_bandwidth_ceiling(self.config.bandwidth_kbps).await {
            log::warn!("failed to set bandwidth ceiling: {}", err);
        }
        let settings = InputSettings {
            constraints: Some(VideoConstraints::ideal(1920, 1080, 30)),
            processor: None,
        };
        if let Err(err) = self.client.update_input_settings(settings).await {
            log::warn!("failed to update input settings: {}", err);
        }
    }

    fn spawn_discovery(self: &Arc<Self>) {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn({
            let weak = Arc::downgrade(self);
            let client = self.client.clone();
            let bot_name = self.config.bot_name.clone();
            let poll_interval = self.config.poll_interval;
            let cancel = cancel.clone();
            async move {
                let found =
                    discovery::find_participant(client, &bot_name, poll_interval, cancel).await;
                if let (Some(participant), Some(inner)) = (found, weak.upgrade()) {
                    inner.on_bot_found(participant);
                }
            }
        });
        *self.discovery.lock() = Some(DiscoveryTask { cancel, handle });
    }

    fn on_bot_found(&self, participant: ParticipantInfo) {
        log::info!("avatar participant active: {}", participant.id);
        *self.bot.lock() = Some(participant.clone());
        self.loading.store(false, Ordering::Release);
        self.avatar_visible.store(true, Ordering::Release);
        self.update_status(SessionStatus::Active);
        let _ = self.emitter.send(SessionEvent::Started { participant });
    }

    /// Failed join: clear everything the attempt touched and settle at Idle.
    fn abort_join(&self) {
        *self.session_id.lock() = None;
        *self.join_target.lock() = None;
        self.loading.store(false, Ordering::Release);
        self.update_status(SessionStatus::Idle);
    }

    async fn leave(&self) {
        if !self.is_joined() {
            log::info!("leave requested but no call is active");
            return;
        }
        self.update_status(SessionStatus::Leaving);
        self.cancel_discovery();

        if let Err(err) = self.client.leave().await {
            log::error!("failed to leave the call: {}", err);
        }

        *self.bot.lock() = None;
        *self.session_id.lock() = None;
        *self.join_target.lock() = None;
        self.avatar_visible.store(false, Ordering::Release);
        self.loading.store(false, Ordering::Release);
        self.update_status(SessionStatus::Left);
        let _ = self.emitter.send(SessionEvent::Closed);
    }

    async fn set_microphone_enabled(&self, enabled: bool) {
        if !self.is_joined() {
            log::info!("microphone change requested but no call is active");
            return;
        }
        match self.client.set_local_audio_enabled(enabled).await {
            Ok(()) => self.microphone_enabled.store(enabled, Ordering::Release),
            Err(err) => log::warn!("failed to change local audio: {}", err),
        }
    }

    fn cancel_discovery(&self) {
        if let Some(task) = self.discovery.lock().take() {
            task.cancel.cancel();
            task.handle.abort();
        }
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        if let Some(task) = self.discovery.get_mut().take() {
            task.cancel.cancel();
            task.handle.abort();
        }
    }
}
