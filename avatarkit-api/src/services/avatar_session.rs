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

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{ServiceBase, ServiceError, ServiceResult, DEFAULT_HOST};

const START_SESSION_ENDPOINT: &str = "startE2ESession";

/// Optional fields of a session-creation request. Everything here is
/// forwarded verbatim; the quality hints are advisory and the service is free
/// to ignore them.
#[derive(Debug, Clone)]
pub struct StartSessionOptions {
    pub voice_id: String,
    pub first_message: String,
    pub system_prompt: String,
    pub video_width: u32,
    pub video_height: u32,
    pub video_bitrate: u32,
}

impl Default for StartSessionOptions {
    fn default() -> Self {
        Self {
            voice_id: String::new(),
            first_message: String::new(),
            system_prompt: String::new(),
            video_width: 1920,
            video_height: 1080,
            video_bitrate: 2_500_000,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartSessionRequest<'a> {
    api_key: &'a str,
    face_id: &'a str,
    voice_id: &'a str,
    first_message: &'a str,
    system_prompt: &'a str,
    quality: &'a str,
    resolution: &'a str,
    video_quality: &'a str,
    video_width: u32,
    video_height: u32,
    video_bitrate: u32,
    max_resolution: String,
}

/// Response of a successful session creation. `room_url` is the opaque join
/// target handed to the call client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub room_url: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Client for the remote avatar session service.
#[derive(Debug)]
pub struct SessionService {
    base: ServiceBase,
    host: String,
    client: reqwest::Client,
}

impl SessionService {
    pub fn with_api_key(api_key: &str) -> Self {
        Self::with_host(DEFAULT_HOST, api_key)
    }

    pub fn with_host(host: &str, api_key: &str) -> Self {
        Self {
            base: ServiceBase::with_api_key(api_key),
            host: host.trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a new end-to-end avatar session for the given face. Any non-2xx
    /// status or unparsable body is a [`ServiceError`]; the caller treats both
    /// as a join failure.
    pub async fn start_session(
        &self,
        face_id: &str,
        options: &StartSessionOptions,
    ) -> ServiceResult<SessionInfo> {
        let request = StartSessionRequest {
            api_key: self.base.api_key(),
            face_id,
            voice_id: &options.voice_id,
            first_message: &options.first_message,
            system_prompt: &options.system_prompt,
            quality: "high",
            resolution: "1080p",
            video_quality: "highest",
            video_width: options.video_width,
            video_height: options.video_height,
            video_bitrate: options.video_bitrate,
            max_resolution: format!("{}x{}", options.video_width, options.video_height),
        };

        let resp = self
            .client
            .post(format!("{}/{}", self.host, START_SESSION_ENDPOINT))
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let message = resp.text().await.unwrap_or_default();
            return Err(ServiceError::Api { status: status.as_u16(), message });
        }

        let info: SessionInfo =
            resp.json().await.map_err(|e| ServiceError::Malformed(e.to_string()))?;
        if info.room_url.is_empty() {
            return Err(ServiceError::Malformed("response is missing roomUrl".to_owned()));
        }

        log::debug!("created avatar session, join target: {}", info.room_url);
        Ok(info)
    }
}
