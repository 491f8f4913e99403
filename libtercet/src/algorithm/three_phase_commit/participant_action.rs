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

use crate::algorithm::{Action, Value};
use crate::process::Process;
use crate::time::Time;

use super::DecisionReason;
use super::ParticipantContext;
use super::ThreePhaseCommitContext;
use super::ThreePhaseCommitMessage;

#[derive(Debug, PartialEq)]
pub enum ParticipantAction<P, V, T>
where
    P: Process,
    V: Value,
    T: Time,
{
    Notify(ParticipantActionNotification<P, V>),
    SendMessage(P, ThreePhaseCommitMessage<V>),
    Update {
        context: ThreePhaseCommitContext<P, T, ParticipantContext<P>>,
        alarm: Option<T>,
    },
}

impl<P, V, T> Action for ParticipantAction<P, V, T>
where
    P: Process,
    V: Value,
    T: Time,
{
}

#[derive(Debug, PartialEq)]
pub enum ParticipantActionNotification<P, V>
where
    P: Process,
    V: Value,
{
    Abort(DecisionReason<P>),
    Commit(DecisionReason<P>),
    /// The elected successor did not announce a decision in time.
    ElectionFailed(P),
    MessageDropped(String),
    /// Perform the local work for the value and answer with a `Vote` event.
    RequestForVote(V),
}
