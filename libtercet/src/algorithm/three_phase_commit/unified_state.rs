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

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::str::FromStr;

use crate::error::InvalidStateError;

use super::CoordinatorState;
use super::ParticipantState;

/// The states shared by both roles, as they are written to the stable log.
///
/// Each state has a stable upper-case label (`INIT`, `READY`, ...). The label is also the raw
/// payload an elected successor coordinator broadcasts when it takes over.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ThreePhaseCommitState {
    New,
    Init,
    Wait,
    Ready,
    PreCommit,
    Commit,
    Abort,
}

impl ThreePhaseCommitState {
    pub fn label(&self) -> &'static str {
        match self {
            ThreePhaseCommitState::New => "NEW",
            ThreePhaseCommitState::Init => "INIT",
            ThreePhaseCommitState::Wait => "WAIT",
            ThreePhaseCommitState::Ready => "READY",
            ThreePhaseCommitState::PreCommit => "PRECOMMIT",
            ThreePhaseCommitState::Commit => "COMMIT",
            ThreePhaseCommitState::Abort => "ABORT",
        }
    }

    /// Returns true for COMMIT and ABORT; nothing changes a process once it has decided.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ThreePhaseCommitState::Commit | ThreePhaseCommitState::Abort
        )
    }
}

impl Display for ThreePhaseCommitState {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStateError(String);

impl Error for UnknownStateError {}

impl Display for UnknownStateError {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        write!(f, "unknown state label: {}", self.0)
    }
}

impl FromStr for ThreePhaseCommitState {
    type Err = UnknownStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(ThreePhaseCommitState::New),
            "INIT" => Ok(ThreePhaseCommitState::Init),
            "WAIT" => Ok(ThreePhaseCommitState::Wait),
            "READY" => Ok(ThreePhaseCommitState::Ready),
            "PRECOMMIT" => Ok(ThreePhaseCommitState::PreCommit),
            "COMMIT" => Ok(ThreePhaseCommitState::Commit),
            "ABORT" => Ok(ThreePhaseCommitState::Abort),
            _ => Err(UnknownStateError(s.to_string())),
        }
    }
}

impl TryFrom<ThreePhaseCommitState> for CoordinatorState {
    type Error = InvalidStateError;

    fn try_from(state: ThreePhaseCommitState) -> Result<Self, InvalidStateError> {
        match state {
            ThreePhaseCommitState::Init => Ok(CoordinatorState::Init),
            ThreePhaseCommitState::Wait => Ok(CoordinatorState::Wait),
            ThreePhaseCommitState::PreCommit => Ok(CoordinatorState::PreCommit),
            ThreePhaseCommitState::Commit => Ok(CoordinatorState::Commit),
            ThreePhaseCommitState::Abort => Ok(CoordinatorState::Abort),
            ThreePhaseCommitState::New | ThreePhaseCommitState::Ready => {
                Err(InvalidStateError::with_message(format!(
                    "invalid state for coordinator: {state:?}",
                )))
            }
        }
    }
}

impl TryFrom<ThreePhaseCommitState> for ParticipantState {
    type Error = InvalidStateError;

    fn try_from(state: ThreePhaseCommitState) -> Result<Self, InvalidStateError> {
        match state {
            ThreePhaseCommitState::New => Ok(ParticipantState::New),
            ThreePhaseCommitState::Init => Ok(ParticipantState::Init),
            ThreePhaseCommitState::Ready => Ok(ParticipantState::Ready),
            ThreePhaseCommitState::PreCommit => Ok(ParticipantState::PreCommit),
            ThreePhaseCommitState::Commit => Ok(ParticipantState::Commit),
            ThreePhaseCommitState::Abort => Ok(ParticipantState::Abort),
            ThreePhaseCommitState::Wait => Err(InvalidStateError::with_message(format!(
                "invalid state for participant: {state:?}",
            ))),
        }
    }
}

impl From<CoordinatorState> for ThreePhaseCommitState {
    fn from(state: CoordinatorState) -> Self {
        match state {
            CoordinatorState::Init => ThreePhaseCommitState::Init,
            CoordinatorState::Wait => ThreePhaseCommitState::Wait,
            CoordinatorState::PreCommit => ThreePhaseCommitState::PreCommit,
            CoordinatorState::Commit => ThreePhaseCommitState::Commit,
            CoordinatorState::Abort => ThreePhaseCommitState::Abort,
        }
    }
}

impl From<ParticipantState> for ThreePhaseCommitState {
    fn from(state: ParticipantState) -> Self {
        match state {
            ParticipantState::New => ThreePhaseCommitState::New,
            // Local work is still part of INIT as far as the log is concerned.
            ParticipantState::Init | ParticipantState::WaitingForVote => {
                ThreePhaseCommitState::Init
            }
            ParticipantState::Ready => ThreePhaseCommitState::Ready,
            ParticipantState::PreCommit => ThreePhaseCommitState::PreCommit,
            ParticipantState::Commit => ThreePhaseCommitState::Commit,
            ParticipantState::Abort => ThreePhaseCommitState::Abort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back() {
        for state in [
            ThreePhaseCommitState::New,
            ThreePhaseCommitState::Init,
            ThreePhaseCommitState::Wait,
            ThreePhaseCommitState::Ready,
            ThreePhaseCommitState::PreCommit,
            ThreePhaseCommitState::Commit,
            ThreePhaseCommitState::Abort,
        ] {
            assert_eq!(state.to_string().parse::<ThreePhaseCommitState>(), Ok(state));
        }

        assert!("PREPARED".parse::<ThreePhaseCommitState>().is_err());
    }

    #[test]
    fn only_commit_and_abort_are_terminal() {
        assert!(ThreePhaseCommitState::Commit.is_terminal());
        assert!(ThreePhaseCommitState::Abort.is_terminal());
        assert!(!ThreePhaseCommitState::PreCommit.is_terminal());
        assert!(!ThreePhaseCommitState::Ready.is_terminal());
        assert!(!ThreePhaseCommitState::Wait.is_terminal());
    }

    #[test]
    fn role_conversions() {
        assert_eq!(
            ThreePhaseCommitState::from(ParticipantState::WaitingForVote),
            ThreePhaseCommitState::Init
        );
        assert!(CoordinatorState::try_from(ThreePhaseCommitState::Ready).is_err());
        assert!(ParticipantState::try_from(ThreePhaseCommitState::Wait).is_err());
        assert_eq!(
            ParticipantState::try_from(ThreePhaseCommitState::PreCommit).unwrap(),
            ParticipantState::PreCommit
        );
    }
}
