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

use crate::process::Process;

use super::ThreePhaseCommitState;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParticipantState {
    New,
    Init,
    /// A VoteRequest arrived and the local work has not voted yet.
    WaitingForVote,
    Ready,
    PreCommit,
    Commit,
    Abort,
}

/// Progress of a successor election, from the point of view of a participant which is not the
/// successor itself.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Election<P>
where
    P: Process,
{
    /// The coordinator timed out and this process computed the successor, which has not yet
    /// announced itself.
    Expected(P),
    /// A successor announced its takeover along with the state it decides from.
    Announced {
        successor: P,
        state: ThreePhaseCommitState,
    },
}

impl<P> Election<P>
where
    P: Process,
{
    pub fn successor(&self) -> &P {
        match self {
            Election::Expected(successor) => successor,
            Election::Announced { successor, .. } => successor,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParticipantContext<P>
where
    P: Process,
{
    pub(super) participant_processes: Vec<P>,
    pub(super) state: ParticipantState,
    pub(super) election: Option<Election<P>>,
}
