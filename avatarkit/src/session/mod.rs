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

use thiserror::Error;
use tokio::sync::mpsc;

pub mod attachment;
pub mod client;
pub mod controller;
pub mod discovery;
pub mod element;
pub mod id;
pub mod participant;
pub mod provider;
pub mod track;
pub mod view;

pub use controller::*;

use client::ClientError;
use participant::ParticipantInfo;

pub type SessionEvents = mpsc::UnboundedReceiver<SessionEvent>;
pub type SessionEmitter = mpsc::UnboundedSender<SessionEvent>;
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("avatar service: {0}")]
    Service(#[from] avatarkit_api::ServiceError),
    #[error("call client: {0}")]
    Client(#[from] ClientError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("join attempted while session is {0:?}")]
    NotIdle(SessionStatus),
}

/// Lifecycle state of the avatar session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SessionStatus {
    Idle,
    Joining,
    Joined,
    Discovering,
    Active,
    Leaving,
    Left,
}

impl From<u8> for SessionStatus {
    fn from(value: u8) -> Self {
        match value {
            1 => SessionStatus::Joining,
            2 => SessionStatus::Joined,
            3 => SessionStatus::Discovering,
            4 => SessionStatus::Active,
            5 => SessionStatus::Leaving,
            6 => SessionStatus::Left,
            _ => SessionStatus::Idle,
        }
    }
}

#[derive(Clone, Debug)]
pub enum SessionEvent {
    StatusChanged(SessionStatus),
    /// The avatar participant was found and its stream is ready to render.
    Started { participant: ParticipantInfo },
    /// Leave completed and the session resources were released.
    Closed,
}
