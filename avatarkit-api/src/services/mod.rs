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

use thiserror::Error;

pub mod avatar_session;

pub use avatar_session::{SessionInfo, SessionService, StartSessionOptions};

/// Default host of the avatar session service.
pub const DEFAULT_HOST: &str = "https://api.simli.ai";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to execute the request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("service rejected the request ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Shared state of the service clients. The api key is forwarded with every
/// request body; it is never logged.
pub(crate) struct ServiceBase {
    api_key: String,
}

impl Debug for ServiceBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceBase").finish_non_exhaustive()
    }
}

impl ServiceBase {
    pub fn with_api_key(api_key: &str) -> Self {
        Self { api_key: api_key.to_owned() }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}
