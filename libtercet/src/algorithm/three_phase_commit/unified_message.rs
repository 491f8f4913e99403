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

//! Contains ThreePhaseCommitMessage, the set of all messages exchanged by the protocol.

use crate::algorithm::Value;
use crate::message::Message;

use super::ThreePhaseCommitState;

/// A message exchanged between the coordinator and the participants.
#[derive(Clone, Debug, PartialEq)]
pub enum ThreePhaseCommitMessage<V>
where
    V: Value,
{
    /// Coordinator to participants: vote on the value.
    VoteRequest(V),
    VoteCommit,
    VoteAbort,
    /// Coordinator to participants: every participant voted commit.
    PrepareCommit,
    /// Participant to coordinator: acknowledges `PrepareCommit`.
    ReadyCommit,
    GlobalCommit,
    GlobalAbort,
    /// Elected successor to the other participants: the state the successor decides from.
    Takeover(ThreePhaseCommitState),
}

impl<V> ThreePhaseCommitMessage<V>
where
    V: Value,
{
    /// The name of the message kind, without its payload.
    pub fn name(&self) -> &'static str {
        match self {
            ThreePhaseCommitMessage::VoteRequest(_) => "VoteRequest",
            ThreePhaseCommitMessage::VoteCommit => "VoteCommit",
            ThreePhaseCommitMessage::VoteAbort => "VoteAbort",
            ThreePhaseCommitMessage::PrepareCommit => "PrepareCommit",
            ThreePhaseCommitMessage::ReadyCommit => "ReadyCommit",
            ThreePhaseCommitMessage::GlobalCommit => "GlobalCommit",
            ThreePhaseCommitMessage::GlobalAbort => "GlobalAbort",
            ThreePhaseCommitMessage::Takeover(_) => "Takeover",
        }
    }
}

impl<V> Message for ThreePhaseCommitMessage<V> where V: Value {}
