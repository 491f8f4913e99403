// Copyright 2021-2022 Cargill Incorporated
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

//! Contains CoordinatorMessage, a message which is delivered to the coordinator.

use std::convert::TryFrom;

use crate::algorithm::Value;
use crate::error::ProtocolViolationError;

use super::ThreePhaseCommitMessage;

/// A message which is delivered to the coordinator.
///
/// This is a subset of `ThreePhaseCommitMessage`, containing only the set of messages which can
/// be delivered to a coordinator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CoordinatorMessage {
    VoteCommit,
    VoteAbort,
    ReadyCommit,
}

impl CoordinatorMessage {
    pub fn name(&self) -> &'static str {
        match self {
            CoordinatorMessage::VoteCommit => "VoteCommit",
            CoordinatorMessage::VoteAbort => "VoteAbort",
            CoordinatorMessage::ReadyCommit => "ReadyCommit",
        }
    }
}

impl<V> From<CoordinatorMessage> for ThreePhaseCommitMessage<V>
where
    V: Value,
{
    fn from(message: CoordinatorMessage) -> Self {
        match message {
            CoordinatorMessage::VoteCommit => ThreePhaseCommitMessage::VoteCommit,
            CoordinatorMessage::VoteAbort => ThreePhaseCommitMessage::VoteAbort,
            CoordinatorMessage::ReadyCommit => ThreePhaseCommitMessage::ReadyCommit,
        }
    }
}

impl<V> TryFrom<ThreePhaseCommitMessage<V>> for CoordinatorMessage
where
    V: Value,
{
    type Error = ProtocolViolationError;

    fn try_from(message: ThreePhaseCommitMessage<V>) -> Result<Self, Self::Error> {
        match message {
            ThreePhaseCommitMessage::VoteCommit => Ok(CoordinatorMessage::VoteCommit),
            ThreePhaseCommitMessage::VoteAbort => Ok(CoordinatorMessage::VoteAbort),
            ThreePhaseCommitMessage::ReadyCommit => Ok(CoordinatorMessage::ReadyCommit),
            other => Err(ProtocolViolationError::new(
                "a message a coordinator can handle".into(),
                other.name().into(),
            )),
        }
    }
}
