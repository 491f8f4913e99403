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

use crate::error::InvalidStateError;
use crate::process::Process;
use crate::time::Time;

use super::CoordinatorContext;
use super::CoordinatorState;
use super::Participant;
use super::ParticipantContext;
use super::ParticipantState;
use super::ThreePhaseCommitContext;
use super::ThreePhaseCommitState;

/// Builds the context of either role.
///
/// A coordinator context starts in INIT and a participant context in NEW unless a state is
/// given explicitly.
#[derive(Default)]
pub struct ThreePhaseCommitContextBuilder<P, T>
where
    P: Process,
    T: Time,
{
    alarm: Option<T>,
    coordinator: Option<P>,
    participants: Option<Vec<P>>,
    state: Option<ThreePhaseCommitState>,
    this_process: Option<P>,
}

impl<P, T> ThreePhaseCommitContextBuilder<P, T>
where
    P: Process,
    T: Time,
{
    pub fn new() -> Self {
        Self {
            alarm: None,
            coordinator: None,
            participants: None,
            state: None,
            this_process: None,
        }
    }

    pub fn with_alarm(mut self, alarm: T) -> Self {
        self.alarm = Some(alarm);
        self
    }

    pub fn with_coordinator(mut self, coordinator: P) -> Self {
        self.coordinator = Some(coordinator);
        self
    }

    pub fn with_participants(mut self, participants: Vec<P>) -> Self {
        self.participants = Some(participants);
        self
    }

    pub fn with_state(mut self, state: ThreePhaseCommitState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_this_process(mut self, this_process: P) -> Self {
        self.this_process = Some(this_process);
        self
    }

    pub fn build_coordinator(
        self,
    ) -> Result<ThreePhaseCommitContext<P, T, CoordinatorContext<P>>, InvalidStateError> {
        let (alarm, coordinator, participants, this_process) = self.common_fields()?;

        if coordinator != this_process {
            return Err(InvalidStateError::with_message(
                "a coordinator context requires this_process to be the coordinator".into(),
            ));
        }

        let state = match self.state {
            Some(state) => CoordinatorState::try_from(state)?,
            None => CoordinatorState::Init,
        };

        Ok(ThreePhaseCommitContext {
            alarm,
            coordinator,
            role_context: CoordinatorContext {
                participants: participants.into_iter().map(Participant::new).collect(),
                state,
            },
            this_process,
        })
    }

    pub fn build_participant(
        self,
    ) -> Result<ThreePhaseCommitContext<P, T, ParticipantContext<P>>, InvalidStateError> {
        let (alarm, coordinator, participant_processes, this_process) = self.common_fields()?;

        if !participant_processes.contains(&this_process) {
            return Err(InvalidStateError::with_message(
                "participants field must contain this_process".into(),
            ));
        }

        let state = match self.state {
            Some(state) => ParticipantState::try_from(state)?,
            None => ParticipantState::New,
        };

        Ok(ThreePhaseCommitContext {
            alarm,
            coordinator,
            role_context: ParticipantContext {
                participant_processes,
                state,
                election: None,
            },
            this_process,
        })
    }

    #[allow(clippy::type_complexity)]
    fn common_fields(&self) -> Result<(Option<T>, P, Vec<P>, P), InvalidStateError> {
        let coordinator = self
            .coordinator
            .clone()
            .ok_or_else(|| InvalidStateError::with_message("missing coordinator field".into()))?;

        let participants = self
            .participants
            .clone()
            .ok_or_else(|| InvalidStateError::with_message("missing participants field".into()))?;

        let this_process = self
            .this_process
            .clone()
            .ok_or_else(|| InvalidStateError::with_message("missing this_process field".into()))?;

        Ok((self.alarm, coordinator, participants, this_process))
    }
}
