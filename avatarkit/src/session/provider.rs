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

use async_trait::async_trait;
use avatarkit_api::services::{SessionService, StartSessionOptions};
use avatarkit_api::ServiceError;

use super::client::JoinTarget;
use super::id::SessionId;

/// Fields of a session-creation request owned by the controller's config.
#[derive(Debug, Clone, Default)]
pub struct SessionRequest {
    pub face_id: String,
    pub voice_id: String,
    pub first_message: String,
    pub system_prompt: String,
}

/// A freshly created remote session: the opaque join target plus the id the
/// service assigned, when it reports one.
#[derive(Debug, Clone)]
pub struct RemoteSession {
    pub id: Option<SessionId>,
    pub join_target: JoinTarget,
}

/// Creates remote avatar sessions. The production implementation is the HTTP
/// [`SessionService`]; tests substitute their own.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn create_session(&self, request: &SessionRequest) -> Result<RemoteSession, ServiceError>;
}

#[async_trait]
impl SessionProvider for SessionService {
    async fn create_session(&self, request: &SessionRequest) -> Result<RemoteSession, ServiceError> {
        let options = StartSessionOptions {
            voice_id: request.voice_id.clone(),
            first_message: request.first_message.clone(),
            system_prompt: request.system_prompt.clone(),
            ..Default::default()
        };
        let info = self.start_session(&request.face_id, &options).await?;
        Ok(RemoteSession {
            id: info.session_id.map(SessionId::from),
            join_target: JoinTarget::from(info.room_url),
        })
    }
}
