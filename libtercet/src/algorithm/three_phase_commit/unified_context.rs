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
use crate::time::Time;

use super::{CoordinatorContext, CoordinatorState, Participant};
use super::{Election, ParticipantContext, ParticipantState};

/// The context of one process taking part in a transaction.
///
/// The fields common to both roles live here; `R` holds the role-specific part.
#[derive(Clone, Debug, PartialEq)]
pub struct ThreePhaseCommitContext<P, T, R>
where
    P: Process,
    T: Time,
    R: Clone,
{
    pub(super) alarm: Option<T>,
    pub(super) coordinator: P,
    pub(super) role_context: R,
    pub(super) this_process: P,
}

impl<P, T, R> ThreePhaseCommitContext<P, T, R>
where
    P: Process,
    T: Time,
    R: Clone,
{
    pub fn alarm(&self) -> &Option<T> {
        &self.alarm
    }

    pub fn set_alarm(&mut self, alarm: Option<T>) {
        self.alarm = alarm;
    }

    pub fn coordinator(&self) -> &P {
        &self.coordinator
    }

    pub fn this_process(&self) -> &P {
        &self.this_process
    }
}

impl<P, T> ThreePhaseCommitContext<P, T, CoordinatorContext<P>>
where
    P: Process,
    T: Time,
{
    pub fn participants(&self) -> &Vec<Participant<P>> {
        &self.role_context.participants
    }

    pub(super) fn participants_mut(&mut self) -> &mut Vec<Participant<P>> {
        &mut self.role_context.participants
    }

    pub fn state(&self) -> &CoordinatorState {
        &self.role_context.state
    }

    pub(super) fn set_state(&mut self, state: CoordinatorState) {
        self.role_context.state = state;
    }
}

impl<P, T> ThreePhaseCommitContext<P, T, ParticipantContext<P>>
where
    P: Process,
    T: Time,
{
    pub fn participant_processes(&self) -> &Vec<P> {
        &self.role_context.participant_processes
    }

    pub fn state(&self) -> &ParticipantState {
        &self.role_context.state
    }

    pub(super) fn set_state(&mut self, state: ParticipantState) {
        self.role_context.state = state;
    }

    pub fn election(&self) -> &Option<Election<P>> {
        &self.role_context.election
    }

    pub(super) fn set_election(&mut self, election: Option<Election<P>>) {
        self.role_context.election = election;
    }

    /// Every participant other than this one.
    pub fn peers(&self) -> impl Iterator<Item = &P> {
        self.role_context
            .participant_processes
            .iter()
            .filter(move |p| *p != &self.this_process)
    }
}
