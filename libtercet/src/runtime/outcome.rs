// Copyright 2021 Cargill Incorporated
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

use crate::algorithm::three_phase_commit::{DecisionReason, ThreePhaseCommitState};
use crate::process::Process;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Coordinator,
    Participant,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        match self {
            Role::Coordinator => f.write_str("Coordinator"),
            Role::Participant => f.write_str("Participant"),
        }
    }
}

/// How a coordinator or participant finished a transaction attempt.
///
/// `state` is the last state written to the process's stable log. For a crashed process it is the
/// state the process would recover into, which may be a non-terminal one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome<P>
where
    P: Process,
{
    role: Role,
    process: P,
    state: ThreePhaseCommitState,
    reason: DecisionReason<P>,
}

impl<P> Outcome<P>
where
    P: Process,
{
    pub fn new(
        role: Role,
        process: P,
        state: ThreePhaseCommitState,
        reason: DecisionReason<P>,
    ) -> Self {
        Outcome {
            role,
            process,
            state,
            reason,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn process(&self) -> &P {
        &self.process
    }

    pub fn state(&self) -> ThreePhaseCommitState {
        self.state
    }

    pub fn reason(&self) -> &DecisionReason<P> {
        &self.reason
    }

    pub fn is_crash(&self) -> bool {
        matches!(self.reason, DecisionReason::Crashed)
    }

    pub fn is_commit(&self) -> bool {
        self.state == ThreePhaseCommitState::Commit
    }

    pub fn is_abort(&self) -> bool {
        self.state == ThreePhaseCommitState::Abort
    }
}

impl<P> Display for Outcome<P>
where
    P: Process,
{
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        write!(
            f,
            "{} {} terminated in state {} ({})",
            self.role, self.process, self.state, self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let outcome = Outcome::new(
            Role::Coordinator,
            0u64,
            ThreePhaseCommitState::Commit,
            DecisionReason::AllVotedCommit,
        );
        assert_eq!(
            outcome.to_string(),
            "Coordinator 0 terminated in state COMMIT (all participants voted commit)"
        );

        let outcome = Outcome::new(
            Role::Participant,
            2u64,
            ThreePhaseCommitState::Ready,
            DecisionReason::Crashed,
        );
        assert!(outcome.is_crash());
        assert!(!outcome.is_commit() && !outcome.is_abort());
        assert_eq!(
            outcome.to_string(),
            "Participant 2 terminated in state READY (crashed)"
        );
    }
}
