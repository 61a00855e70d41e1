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

use tokio_util::sync::CancellationToken;

use super::client::{CallClient, InputSettings, QualityScope, QualityTier, SubscriptionOptions, VideoProcessor};
use super::participant::ParticipantInfo;

/// Poll the session until a participant named `role_name` appears, then
/// subscribe to it at the highest quality tier and resolve exactly once.
///
/// Matching is exact and case-sensitive. There is deliberately no timeout:
/// the loop retries forever and only the cancellation token (session
/// teardown) ends it early, in which case `None` is returned.
pub async fn find_participant(
    client: Arc<dyn CallClient>,
    role_name: &str,
    poll_interval: Duration,
    cancel: CancellationToken,
) -> Option<ParticipantInfo> {
    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut polls: u64 = 0;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                log::debug!("discovery cancelled after {} polls", polls);
                return None;
            }
            _ = interval.tick() => {
                if cancel.is_cancelled() {
                    return None;
                }
                polls += 1;
                if let Some(found) = check_once(client.as_ref(), role_name).await {
                    log::info!("found participant {:?} after {} polls", found.name, polls);
                    return Some(found);
                }
                log::debug!("participant {:?} not present yet (poll {})", role_name, polls);
            }
        }
    }
}

/// One poll: enumerate participants and, on the first exact name match,
/// request subscription and top delivery quality for that participant. Every
/// follow-up command is best-effort; a failure never discards the match.
async fn check_once(client: &dyn CallClient, role_name: &str) -> Option<ParticipantInfo> {
    let matched = client.participants().into_iter().find(|p| p.name == role_name)?;

    if let Err(err) =
        client.update_subscription(&matched.id, SubscriptionOptions { subscribed: true }).await
    {
        log::warn!("failed to subscribe to {}: {}", matched.id, err);
    }

    if let Err(err) = client
        .update_receive_quality(QualityScope::Participant(matched.id.clone()), QualityTier::High)
        .await
    {
        log::warn!("failed to raise receive quality for {}: {}", matched.id, err);
    }

    // Post-processing can down-scale the inbound stream; turn it off for the
    // avatar.
    if let Err(err) = client
        .update_input_settings(InputSettings {
            constraints: None,
            processor: Some(VideoProcessor::None),
        })
        .await
    {
        log::warn!("failed to disable video processing: {}", err);
    }

    // Re-read the participant so the returned snapshot carries the track
    // handles created by the subscription.
    let refreshed = client.participant(&matched.id).unwrap_or(matched);
    log::debug!("participant {} tracks: video={} audio={}",
        refreshed.id,
        refreshed.tracks.video.is_some(),
        refreshed.tracks.audio.is_some());
    Some(refreshed)
}
