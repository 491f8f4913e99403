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

use std::fmt::{Display, Formatter, Result as FormatResult};

use crate::process::Process;

use super::ThreePhaseCommitState;

/// A participant's local outcome, sent to the coordinator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Vote {
    Commit,
    Abort,
}

/// The global outcome of a transaction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
    Commit,
    Abort,
}

impl Decision {
    pub fn state(&self) -> ThreePhaseCommitState {
        match self {
            Decision::Commit => ThreePhaseCommitState::Commit,
            Decision::Abort => ThreePhaseCommitState::Abort,
        }
    }
}

/// Why a process reached its terminal state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecisionReason<P>
where
    P: Process,
{
    /// Coordinator: every participant voted commit.
    AllVotedCommit,
    /// Coordinator: the given participant voted abort.
    VotedAbort(P),
    /// Coordinator: these participants did not vote in time.
    VoteTimeout(Vec<P>),
    /// Participant: the local work decided to abort.
    LocalAbort,
    /// Participant: the coordinator never asked for a vote.
    NoVoteRequest,
    /// Participant: the coordinator sent the global decision.
    GlobalDecision(P),
    /// Participant: an elected successor coordinator decided from its last state.
    Takeover {
        successor: P,
        state: ThreePhaseCommitState,
    },
    /// The process was stopped by fault injection before it decided.
    Crashed,
}

impl<P> Display for DecisionReason<P>
where
    P: Process,
{
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        match self {
            DecisionReason::AllVotedCommit => f.write_str("all participants voted commit"),
            DecisionReason::VotedAbort(p) => write!(f, "participant {} voted abort", p),
            DecisionReason::VoteTimeout(silent) => {
                let silent = silent
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "timeout waiting for votes from {}", silent)
            }
            DecisionReason::LocalAbort => f.write_str("local abort"),
            DecisionReason::NoVoteRequest => f.write_str("no vote request from coordinator"),
            DecisionReason::GlobalDecision(p) => {
                write!(f, "global decision from coordinator {}", p)
            }
            DecisionReason::Takeover { successor, state } => write!(
                f,
                "decision of successor coordinator {} in state {}",
                successor, state
            ),
            DecisionReason::Crashed => f.write_str("crashed"),
        }
    }
}
