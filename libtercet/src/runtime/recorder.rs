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

use crate::algorithm::three_phase_commit::{DecisionReason, ThreePhaseCommitState};
use crate::error::InternalError;
use crate::process::Process;
use crate::stable_log::{StableLog, StableLogEntry};
use crate::time::TimeSource;

use super::{CrashPoint, FaultInjector, Outcome, Role};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Progress {
    Continue,
    Crashed,
}

/// Writes each newly entered state to the stable log, consulting the fault injector around
/// every entry.
pub(super) struct StateRecorder<P, L, TS>
where
    P: Process,
    L: StableLog<P, TS::Time>,
    TS: TimeSource,
{
    role: Role,
    process: P,
    log: L,
    time_source: TS,
    faults: Box<dyn FaultInjector + Send>,
    logged: Option<ThreePhaseCommitState>,
    entered: Option<ThreePhaseCommitState>,
}

impl<P, L, TS> StateRecorder<P, L, TS>
where
    P: Process,
    L: StableLog<P, TS::Time>,
    TS: TimeSource,
{
    pub fn new(
        role: Role,
        process: P,
        log: L,
        time_source: TS,
        faults: Box<dyn FaultInjector + Send>,
    ) -> Self {
        StateRecorder {
            role,
            process,
            log,
            time_source,
            faults,
            logged: None,
            entered: None,
        }
    }

    /// Log `state` if it differs from the last logged state.
    pub fn record(&mut self, state: ThreePhaseCommitState) -> Result<Progress, InternalError> {
        if self.logged == Some(state) {
            return Ok(Progress::Continue);
        }

        if self.faults.should_crash(&CrashPoint::BeforeEnter(state)) {
            warn!(
                "{} {} crashed before entering state {}",
                self.role, self.process, state
            );
            return Ok(Progress::Crashed);
        }

        self.log.append(StableLogEntry::new(
            self.process.clone(),
            state,
            self.time_source.now(),
        ))?;
        info!("{} {} entered state {}", self.role, self.process, state);

        self.logged = Some(state);
        self.entered = Some(state);
        Ok(Progress::Continue)
    }

    /// Called once all actions caused by an event have been applied.
    pub fn finish_batch(&mut self) -> Progress {
        match self.entered.take() {
            Some(state) if self.faults.should_crash(&CrashPoint::AfterEnter(state)) => {
                warn!(
                    "{} {} crashed after entering state {}",
                    self.role, self.process, state
                );
                Progress::Crashed
            }
            _ => Progress::Continue,
        }
    }

    pub fn outcome(&self, reason: DecisionReason<P>) -> Outcome<P> {
        Outcome::new(
            self.role,
            self.process.clone(),
            self.logged.unwrap_or(ThreePhaseCommitState::New),
            reason,
        )
    }

    pub fn crash_outcome(&self) -> Outcome<P> {
        self.outcome(DecisionReason::Crashed)
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use crate::stable_log::{MemoryStableLog, MemoryStableLogFactory, StableLogFactory};
    use crate::time::SystemTimeFactory;

    use super::super::{CrashAt, NoFaults};
    use super::*;

    fn recorder(
        factory: &MemoryStableLogFactory<u64, SystemTime>,
        faults: Box<dyn FaultInjector + Send>,
    ) -> StateRecorder<u64, MemoryStableLog<u64, SystemTime>, SystemTimeFactory> {
        StateRecorder::new(
            Role::Participant,
            1,
            factory.create_log("participant-1").unwrap(),
            SystemTimeFactory::new(),
            faults,
        )
    }

    #[test]
    fn repeated_states_are_logged_once() {
        let factory = MemoryStableLogFactory::new();
        let mut recorder = recorder(&factory, Box::new(NoFaults));

        for state in [
            ThreePhaseCommitState::Init,
            ThreePhaseCommitState::Init,
            ThreePhaseCommitState::Ready,
        ] {
            assert_eq!(recorder.record(state).unwrap(), Progress::Continue);
        }

        assert_eq!(
            factory.states("participant-1"),
            vec![ThreePhaseCommitState::Init, ThreePhaseCommitState::Ready]
        );
    }

    #[test]
    fn crash_before_entering_keeps_previous_state() {
        let factory = MemoryStableLogFactory::new();
        let mut recorder = recorder(
            &factory,
            Box::new(CrashAt(CrashPoint::BeforeEnter(ThreePhaseCommitState::Ready))),
        );

        recorder.record(ThreePhaseCommitState::Init).unwrap();
        assert_eq!(recorder.finish_batch(), Progress::Continue);
        assert_eq!(
            recorder.record(ThreePhaseCommitState::Ready).unwrap(),
            Progress::Crashed
        );

        let outcome = recorder.crash_outcome();
        assert_eq!(outcome.state(), ThreePhaseCommitState::Init);
        assert!(outcome.is_crash());
        assert_eq!(
            factory.states("participant-1"),
            vec![ThreePhaseCommitState::Init]
        );
    }

    #[test]
    fn crash_after_entering_is_reported_at_end_of_batch() {
        let factory = MemoryStableLogFactory::new();
        let mut recorder = recorder(
            &factory,
            Box::new(CrashAt(CrashPoint::AfterEnter(ThreePhaseCommitState::Ready))),
        );

        assert_eq!(
            recorder.record(ThreePhaseCommitState::Ready).unwrap(),
            Progress::Continue
        );
        assert_eq!(recorder.finish_batch(), Progress::Crashed);
        assert_eq!(recorder.crash_outcome().state(), ThreePhaseCommitState::Ready);
    }
}
