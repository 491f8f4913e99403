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

use std::collections::VecDeque;
use std::marker::PhantomData;

use crate::algorithm::three_phase_commit::{
    ParticipantAction, ParticipantActionNotification, ParticipantAlgorithm, ParticipantContext,
    ParticipantEvent, ParticipantMessage, ThreePhaseCommitContext, ThreePhaseCommitContextBuilder,
    ThreePhaseCommitMessage, ThreePhaseCommitState, Timeouts,
};
use crate::algorithm::{Algorithm, Value};
use crate::error::{ElectionFailedError, InvalidStateError, ProtocolViolationError, RunError};
use crate::links::Channel;
use crate::process::Process;
use crate::stable_log::{StableLog, StableLogFactory};
use crate::time::{Time, TimeSource};

use super::recorder::{Progress, StateRecorder};
use super::{
    AlwaysCommit, FaultInjector, LocalWork, NoFaults, Outcome, Role, COORDINATOR_GROUP,
    PARTICIPANT_GROUP,
};

type Context<P, T> = ThreePhaseCommitContext<P, T, ParticipantContext<P>>;

/// Drives a [`ParticipantAlgorithm`] for a single transaction.
///
/// Create with a [`ParticipantBuilder`], call [`init`](Participant::init) once the coordinator
/// and every participant have joined, then [`run`](Participant::run) to completion.
pub struct Participant<P, V, C, L, TS>
where
    P: Process,
    V: Value,
    C: Channel<P, ThreePhaseCommitMessage<V>>,
    L: StableLog<P, TS::Time>,
    TS: TimeSource + Clone,
{
    algorithm: ParticipantAlgorithm<P, V, TS>,
    channel: C,
    context: Option<Context<P, TS::Time>>,
    finished: Option<Outcome<P>>,
    pending: VecDeque<ParticipantEvent<P, V>>,
    process: P,
    recorder: StateRecorder<P, L, TS>,
    sources: Vec<P>,
    time_source: TS,
    work: Box<dyn LocalWork<V> + Send>,
}

impl<P, V, C, L, TS> Participant<P, V, C, L, TS>
where
    P: Process,
    V: Value,
    C: Channel<P, ThreePhaseCommitMessage<V>>,
    L: StableLog<P, TS::Time>,
    TS: TimeSource + Clone,
{
    pub fn process(&self) -> &P {
        &self.process
    }

    /// Bind to the channel, take snapshots of the coordinator and participant groups, then enter
    /// INIT and start waiting for a vote request.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel or the stable log fails, if the coordinator group does not
    /// contain exactly one process, or if called twice.
    pub fn init(&mut self) -> Result<(), RunError> {
        if self.context.is_some() || self.finished.is_some() {
            return Err(InvalidStateError::with_message(format!(
                "participant {} is already initialized",
                self.process
            ))
            .into());
        }

        self.channel.bind(&self.process)?;

        let coordinator = match self.channel.subgroup(COORDINATOR_GROUP)?.as_slice() {
            [coordinator] => coordinator.clone(),
            coordinators => {
                return Err(InvalidStateError::with_message(format!(
                    "expected exactly one coordinator, found {}",
                    coordinators.len()
                ))
                .into())
            }
        };
        let participants = self.channel.subgroup(PARTICIPANT_GROUP)?;
        debug!(
            "Participant {} found coordinator {} and participants {:?}",
            self.process, coordinator, participants
        );

        let mut context = ThreePhaseCommitContextBuilder::new()
            .with_coordinator(coordinator.clone())
            .with_this_process(self.process.clone())
            .with_participants(participants)
            .build_participant()?;

        self.sources = std::iter::once(coordinator)
            .chain(context.peers().cloned())
            .collect();

        let actions = self
            .algorithm
            .event(ParticipantEvent::Start(), context.clone())?;
        self.finished = self.apply(actions, &mut context)?;
        self.context = Some(context);

        Ok(())
    }

    /// Run the transaction until the participant decides or crashes.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::ElectionFailed`] if the successor coordinator never decides, and
    /// other errors if called before [`init`](Participant::init), if a collaborator fails, or if
    /// another process violates the protocol.
    pub fn run(mut self) -> Result<Outcome<P>, RunError> {
        let mut context = self.context.take().ok_or_else(|| {
            InvalidStateError::with_message(format!(
                "participant {} must be initialized before it is run",
                self.process
            ))
        })?;

        if let Some(outcome) = self.finished.take() {
            return Ok(outcome);
        }

        loop {
            let event = match self.pending.pop_front() {
                Some(event) => event,
                None => self.next_event(&context)?,
            };

            let actions = self.algorithm.event(event, context.clone())?;
            if let Some(outcome) = self.apply(actions, &mut context)? {
                return Ok(outcome);
            }
        }
    }

    // Returns the outcome once the participant has decided or crashed.
    fn apply(
        &mut self,
        actions: Vec<ParticipantAction<P, V, TS::Time>>,
        context: &mut Context<P, TS::Time>,
    ) -> Result<Option<Outcome<P>>, RunError> {
        let mut decided = None;

        for action in actions {
            match action {
                ParticipantAction::Update {
                    context: mut updated,
                    alarm,
                } => {
                    let state = ThreePhaseCommitState::from(*updated.state());
                    if self.recorder.record(state)? == Progress::Crashed {
                        return Ok(Some(self.recorder.crash_outcome()));
                    }
                    updated.set_alarm(alarm);
                    *context = updated;
                }
                ParticipantAction::SendMessage(process, message) => {
                    debug!(
                        "Participant {} sending {} to {}",
                        self.process,
                        message.name(),
                        process
                    );
                    self.channel
                        .send_to(std::slice::from_ref(&process), message)?;
                }
                ParticipantAction::Notify(notification) => match notification {
                    ParticipantActionNotification::RequestForVote(value) => {
                        let vote = self.work.vote(&value);
                        debug!("Participant {} votes {:?}", self.process, vote);
                        self.pending.push_back(ParticipantEvent::Vote(vote));
                    }
                    ParticipantActionNotification::Commit(reason)
                    | ParticipantActionNotification::Abort(reason) => decided = Some(reason),
                    ParticipantActionNotification::ElectionFailed(successor) => {
                        error!(
                            "Participant {} received no decision from successor coordinator {}",
                            self.process, successor
                        );
                        return Err(ElectionFailedError::new(
                            self.process.to_string(),
                            successor.to_string(),
                        )
                        .into());
                    }
                    ParticipantActionNotification::MessageDropped(reason) => {
                        warn!("Participant {} dropped a message: {}", self.process, reason)
                    }
                },
            }
        }

        if self.recorder.finish_batch() == Progress::Crashed {
            return Ok(Some(self.recorder.crash_outcome()));
        }

        Ok(decided.map(|reason| {
            let outcome = self.recorder.outcome(reason);
            info!("{}", outcome);
            outcome
        }))
    }

    fn next_event(
        &self,
        context: &Context<P, TS::Time>,
    ) -> Result<ParticipantEvent<P, V>, RunError> {
        let alarm = (*context.alarm()).ok_or_else(|| {
            InvalidStateError::with_message(format!(
                "participant {} has nothing to wait for in state {:?}",
                self.process,
                context.state()
            ))
        })?;
        let timeout = alarm.duration_since_or_zero(self.time_source.now());

        match self.channel.receive_from(&self.sources, timeout)? {
            Some((process, message)) => {
                debug!(
                    "Participant {} received {} from {}",
                    self.process,
                    message.name(),
                    process
                );
                let message = ParticipantMessage::try_from(message).map_err(|err| {
                    ProtocolViolationError::new(
                        err.expected().into(),
                        format!("{} from {}", err.received(), process),
                    )
                })?;
                Ok(ParticipantEvent::Deliver(process, message))
            }
            None => Ok(ParticipantEvent::Alarm()),
        }
    }
}

/// Builds a [`Participant`], joining the participant group and creating its stable log.
///
/// The channel, log factory and time source are required. Unless configured, timeouts default
/// to [`Timeouts::default`], the participant always votes commit and no faults are injected.
pub struct ParticipantBuilder<P, V, C, F, TS>
where
    P: Process,
    V: Value,
    C: Channel<P, ThreePhaseCommitMessage<V>>,
    F: StableLogFactory<P, TS::Time>,
    TS: TimeSource + Clone,
{
    _process_phantom: PhantomData<P>,
    channel: Option<C>,
    faults: Option<Box<dyn FaultInjector + Send>>,
    log_factory: Option<F>,
    time_source: Option<TS>,
    timeouts: Option<Timeouts>,
    work: Option<Box<dyn LocalWork<V> + Send>>,
}

impl<P, V, C, F, TS> ParticipantBuilder<P, V, C, F, TS>
where
    P: Process,
    V: Value,
    C: Channel<P, ThreePhaseCommitMessage<V>>,
    F: StableLogFactory<P, TS::Time>,
    TS: TimeSource + Clone,
{
    pub fn new() -> Self {
        ParticipantBuilder {
            _process_phantom: PhantomData,
            channel: None,
            faults: None,
            log_factory: None,
            time_source: None,
            timeouts: None,
            work: None,
        }
    }

    pub fn with_channel(mut self, channel: C) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn with_fault_injector<I>(mut self, faults: I) -> Self
    where
        I: FaultInjector + Send + 'static,
    {
        self.faults = Some(Box::new(faults));
        self
    }

    pub fn with_log_factory(mut self, log_factory: F) -> Self {
        self.log_factory = Some(log_factory);
        self
    }

    pub fn with_local_work<W>(mut self, work: W) -> Self
    where
        W: LocalWork<V> + Send + 'static,
    {
        self.work = Some(Box::new(work));
        self
    }

    pub fn with_time_source(mut self, time_source: TS) -> Self {
        self.time_source = Some(time_source);
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = Some(timeouts);
        self
    }

    /// # Errors
    ///
    /// Returns [`RunError::InvalidState`] if a required field is missing, or
    /// [`RunError::Internal`] if the channel cannot join the group or the log cannot be created.
    pub fn build(self) -> Result<Participant<P, V, C, F::Log, TS>, RunError> {
        let mut channel = self.channel.ok_or_else(|| {
            InvalidStateError::with_message("missing channel field".into())
        })?;
        let log_factory = self.log_factory.ok_or_else(|| {
            InvalidStateError::with_message("missing log_factory field".into())
        })?;
        let time_source = self.time_source.ok_or_else(|| {
            InvalidStateError::with_message("missing time_source field".into())
        })?;
        let timeouts = self.timeouts.unwrap_or_default();
        let faults = self.faults.unwrap_or_else(|| Box::new(NoFaults));
        let work = self.work.unwrap_or_else(|| Box::new(AlwaysCommit));

        let process = channel.join(PARTICIPANT_GROUP)?;
        let log = log_factory.create_log(&format!("participant-{}", process))?;

        Ok(Participant {
            algorithm: ParticipantAlgorithm::new(time_source.clone()).with_timeouts(timeouts),
            channel,
            context: None,
            finished: None,
            pending: VecDeque::new(),
            process: process.clone(),
            recorder: StateRecorder::new(
                Role::Participant,
                process,
                log,
                time_source.clone(),
                faults,
            ),
            sources: Vec::new(),
            time_source,
            work,
        })
    }
}

impl<P, V, C, F, TS> Default for ParticipantBuilder<P, V, C, F, TS>
where
    P: Process,
    V: Value,
    C: Channel<P, ThreePhaseCommitMessage<V>>,
    F: StableLogFactory<P, TS::Time>,
    TS: TimeSource + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
