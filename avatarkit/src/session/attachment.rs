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
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::client::VideoConstraints;
use super::element::{ElementEvent, MediaElement, ReadyState};
use super::id::TrackId;
use super::track::{MediaSource, MediaStream, TrackHandle, TrackKind};

/// Period of the stats re-sampling timer.
pub const STATS_INTERVAL: Duration = Duration::from_millis(500);

/// Delay of the one-shot recheck covering late-arriving dimensions.
pub const LATE_DIMENSIONS_DELAY: Duration = Duration::from_millis(2000);

const IDEAL_CONSTRAINTS: VideoConstraints = VideoConstraints {
    ideal_width: 1920,
    ideal_height: 1080,
    ideal_frame_rate: 30,
    min_width: None,
    min_height: None,
};

const FALLBACK_CONSTRAINTS: VideoConstraints = VideoConstraints {
    ideal_width: 1280,
    ideal_height: 720,
    ideal_frame_rate: 24,
    min_width: None,
    min_height: None,
};

/// Last measured stream diagnostics. Recomputed on a fixed interval and on
/// playback lifecycle events; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsSample {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub ready_state: ReadyState,
}

/// Ownership record of one element/track binding. Dropping it cancels the
/// sampler and listener tasks.
struct Binding {
    track_id: TrackId,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl Binding {
    fn teardown(self) {
        self.cancel.cancel();
        for task in self.tasks {
            task.abort();
        }
    }
}

/// Binds one remote track to one media element and samples its diagnostics.
///
/// Binding is keyed on track identity: attaching the same track twice is a
/// no-op, attaching a different track tears down the previous binding first.
/// Failures past the identity guard are logged and leave the element showing
/// whatever it showed before; they are never fatal.
pub struct MediaAttachment {
    element: Arc<dyn MediaElement>,
    kind: TrackKind,
    stats: Arc<Mutex<StatsSample>>,
    binding: Mutex<Option<Binding>>,
}

impl MediaAttachment {
    pub fn new(element: Arc<dyn MediaElement>, kind: TrackKind) -> Self {
        Self { element, kind, stats: Arc::new(Mutex::new(StatsSample::default())), binding: Mutex::new(None) }
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    /// Identity of the currently bound track, if any.
    pub fn bound_track(&self) -> Option<TrackId> {
        self.binding.lock().as_ref().map(|b| b.track_id.clone())
    }

    pub fn stats(&self) -> StatsSample {
        *self.stats.lock()
    }

    /// Bind `track` to the element. See the type docs for the identity guard;
    /// audio tracks bind from the persistent reference only and carry no
    /// stats machinery.
    pub async fn attach(&self, track: &TrackHandle) {
        if self.binding.lock().as_ref().is_some_and(|b| b.track_id == track.id) {
            log::debug!("track {} already attached, skipping rebind", track.id);
            return;
        }
        self.detach();

        let source = match self.kind {
            TrackKind::Video => track.preferred_source(),
            TrackKind::Audio => match &track.persistent {
                Some(persistent) => persistent.clone(),
                None => {
                    log::debug!("audio track {} has no persistent source yet", track.id);
                    return;
                }
            },
        };

        if self.kind == TrackKind::Video {
            apply_capture_constraints(source.as_ref()).await;
        }

        if let Err(err) = self.element.set_source(Some(MediaStream::single(source.clone()))) {
            log::error!("failed to assign stream for track {}: {}", track.id, err);
            return;
        }

        let mut tasks = Vec::new();
        let cancel = CancellationToken::new();

        if self.kind == TrackKind::Video {
            if let Err(err) = self.element.play().await {
                // Degraded display, not an error worth surfacing.
                log::error!("playback start rejected for track {}: {}", track.id, err);
            }

            let events = self.element.subscribe();
            tasks.push(tokio::spawn(listener_task(
                self.element.clone(),
                source.clone(),
                self.stats.clone(),
                events,
                cancel.clone(),
            )));
            tasks.push(tokio::spawn(sampler_task(
                self.element.clone(),
                source,
                self.stats.clone(),
                cancel.clone(),
            )));
        }

        log::info!("attached {:?} track {}", self.kind, track.id);
        *self.binding.lock() = Some(Binding { track_id: track.id.clone(), cancel, tasks });
    }

    /// Cancel the sampler and listeners and drop the binding record. Safe to
    /// call when nothing is bound.
    pub fn detach(&self) {
        if let Some(binding) = self.binding.lock().take() {
            log::debug!("detaching track {}", binding.track_id);
            binding.teardown();
        }
    }
}

impl Drop for MediaAttachment {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Ask the source for the target capture quality. Two attempts, then give up
/// and keep whatever the track already delivers.
async fn apply_capture_constraints(source: &dyn MediaSource) {
    match source.apply_constraints(&IDEAL_CONSTRAINTS).await {
        Ok(()) => {
            log::debug!("capture constraints applied, settings now {:?}", source.settings());
        }
        Err(err) => {
            log::warn!("could not apply ideal constraints, trying fallback: {}", err);
            if let Err(err) = source.apply_constraints(&FALLBACK_CONSTRAINTS).await {
                log::warn!("fallback constraints failed, keeping current settings: {}", err);
            }
        }
    }
}

/// Refresh the sample from playback lifecycle events.
async fn listener_task(
    element: Arc<dyn MediaElement>,
    source: Arc<dyn MediaSource>,
    stats: Arc<Mutex<StatsSample>>,
    mut events: mpsc::UnboundedReceiver<ElementEvent>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            event = events.recv() => {
                let Some(event) = event else { break };
                match event {
                    ElementEvent::MetadataLoaded | ElementEvent::Playing => {
                        log::debug!("element event {:?}", event);
                        sample_once(element.as_ref(), source.as_ref(), &stats);
                    }
                    ElementEvent::CanPlay => {
                        log::debug!("element can play");
                    }
                }
            }
        }
    }
}

/// Fixed-period re-sampling plus the one-shot late-dimensions recheck.
async fn sampler_task(
    element: Arc<dyn MediaElement>,
    source: Arc<dyn MediaSource>,
    stats: Arc<Mutex<StatsSample>>,
    cancel: CancellationToken,
) {
    let start = tokio::time::Instant::now();
    let mut interval = tokio::time::interval_at(start + STATS_INTERVAL, STATS_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let late_check = tokio::time::sleep(LATE_DIMENSIONS_DELAY);
    tokio::pin!(late_check);
    let mut late_checked = false;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if cancel.is_cancelled() {
                    break;
                }
                sample_once(element.as_ref(), source.as_ref(), &stats);
            }
            _ = &mut late_check, if !late_checked => {
                late_checked = true;
                let (width, _) = element.video_dimensions();
                if width > 0 {
                    log::debug!("delayed check, video dimensions available");
                    sample_once(element.as_ref(), source.as_ref(), &stats);
                }
            }
        }
    }
}

fn sample_once(element: &dyn MediaElement, source: &dyn MediaSource, stats: &Mutex<StatsSample>) {
    let ready_state = element.ready_state();
    let (element_width, element_height) = element.video_dimensions();
    let settings = source.settings();

    // Fall back to source settings while the element still reports zero.
    let width = if element_width > 0 { element_width } else { settings.width };
    let height = if element_height > 0 { element_height } else { settings.height };

    let mut sample = stats.lock();
    sample.ready_state = ready_state;
    if width > 0 && height > 0 {
        sample.width = width;
        sample.height = height;
        sample.frame_rate = settings.frame_rate;
    } else {
        log::debug!("video dimensions not available yet, ready state {}", ready_state);
    }
}
