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

//! Contains ParticipantMessage, a message which is delivered to the participant.

use std::convert::TryFrom;

use crate::algorithm::Value;
use crate::error::ProtocolViolationError;

use super::ThreePhaseCommitMessage;
use super::ThreePhaseCommitState;

/// A message which is delivered to the participant.
///
/// This is a subset of `ThreePhaseCommitMessage`, containing only the set of messages which can
/// be delivered to a participant, whether sent by the coordinator or by an elected successor.
#[derive(Clone, Debug, PartialEq)]
pub enum ParticipantMessage<V>
where
    V: Value,
{
    VoteRequest(V),
    PrepareCommit,
    GlobalCommit,
    GlobalAbort,
    Takeover(ThreePhaseCommitState),
}

impl<V> ParticipantMessage<V>
where
    V: Value,
{
    pub fn name(&self) -> &'static str {
        match self {
            ParticipantMessage::VoteRequest(_) => "VoteRequest",
            ParticipantMessage::PrepareCommit => "PrepareCommit",
            ParticipantMessage::GlobalCommit => "GlobalCommit",
            ParticipantMessage::GlobalAbort => "GlobalAbort",
            ParticipantMessage::Takeover(_) => "Takeover",
        }
    }
}

impl<V> From<ParticipantMessage<V>> for ThreePhaseCommitMessage<V>
where
    V: Value,
{
    fn from(message: ParticipantMessage<V>) -> Self {
        match message {
            ParticipantMessage::VoteRequest(value) => ThreePhaseCommitMessage::VoteRequest(value),
            ParticipantMessage::PrepareCommit => ThreePhaseCommitMessage::PrepareCommit,
            ParticipantMessage::GlobalCommit => ThreePhaseCommitMessage::GlobalCommit,
            ParticipantMessage::GlobalAbort => ThreePhaseCommitMessage::GlobalAbort,
            ParticipantMessage::Takeover(state) => ThreePhaseCommitMessage::Takeover(state),
        }
    }
}

impl<V> TryFrom<ThreePhaseCommitMessage<V>> for ParticipantMessage<V>
where
    V: Value,
{
    type Error = ProtocolViolationError;

    fn try_from(message: ThreePhaseCommitMessage<V>) -> Result<Self, Self::Error> {
        match message {
            ThreePhaseCommitMessage::VoteRequest(value) => {
                Ok(ParticipantMessage::VoteRequest(value))
            }
            ThreePhaseCommitMessage::PrepareCommit => Ok(ParticipantMessage::PrepareCommit),
            ThreePhaseCommitMessage::GlobalCommit => Ok(ParticipantMessage::GlobalCommit),
            ThreePhaseCommitMessage::GlobalAbort => Ok(ParticipantMessage::GlobalAbort),
            ThreePhaseCommitMessage::Takeover(state) => Ok(ParticipantMessage::Takeover(state)),
            other => Err(ProtocolViolationError::new(
                "a message a participant can handle".into(),
                other.name().into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinator_bound_messages_are_rejected() {
        let err = ParticipantMessage::<String>::try_from(ThreePhaseCommitMessage::VoteCommit)
            .unwrap_err();

        assert_eq!(err.received(), "VoteCommit");
        assert_eq!(
            ParticipantMessage::<String>::try_from(ThreePhaseCommitMessage::Takeover(
                ThreePhaseCommitState::Ready
            ))
            .unwrap(),
            ParticipantMessage::Takeover(ThreePhaseCommitState::Ready)
        );
    }
}
