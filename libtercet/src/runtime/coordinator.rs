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

use std::marker::PhantomData;

use crate::algorithm::three_phase_commit::{
    CoordinatorAction, CoordinatorActionNotification, CoordinatorAlgorithm, CoordinatorContext,
    CoordinatorEvent, CoordinatorMessage, ThreePhaseCommitContext, ThreePhaseCommitContextBuilder,
    ThreePhaseCommitMessage, ThreePhaseCommitState, Timeouts,
};
use crate::algorithm::{Algorithm, Value};
use crate::error::{InvalidStateError, ProtocolViolationError, RunError};
use crate::links::Channel;
use crate::process::Process;
use crate::stable_log::{StableLog, StableLogFactory};
use crate::time::{Time, TimeSource};

use super::recorder::{Progress, StateRecorder};
use super::{FaultInjector, NoFaults, Outcome, Role, COORDINATOR_GROUP, PARTICIPANT_GROUP};

type Context<P, T> = ThreePhaseCommitContext<P, T, CoordinatorContext<P>>;

/// Drives a [`CoordinatorAlgorithm`] for a single transaction.
///
/// Create with a [`CoordinatorBuilder`], call [`init`](Coordinator::init) once the participants
/// have joined, then [`run`](Coordinator::run) to completion.
pub struct Coordinator<P, V, C, L, TS>
where
    P: Process,
    V: Value,
    C: Channel<P, ThreePhaseCommitMessage<V>>,
    L: StableLog<P, TS::Time>,
    TS: TimeSource + Clone,
{
    algorithm: CoordinatorAlgorithm<P, V, TS>,
    channel: C,
    context: Option<Context<P, TS::Time>>,
    crashed: bool,
    process: P,
    recorder: StateRecorder<P, L, TS>,
    time_source: TS,
    value: V,
}

impl<P, V, C, L, TS> Coordinator<P, V, C, L, TS>
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

    /// Bind to the channel, enter INIT and take a snapshot of the participant group.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel or the stable log fails, or if called twice.
    pub fn init(&mut self) -> Result<(), RunError> {
        if self.context.is_some() || self.crashed {
            return Err(InvalidStateError::with_message(format!(
                "coordinator {} is already initialized",
                self.process
            ))
            .into());
        }

        self.channel.bind(&self.process)?;
        let participants = self.channel.subgroup(PARTICIPANT_GROUP)?;
        debug!(
            "Coordinator {} found participants {:?}",
            self.process, participants
        );

        let context = ThreePhaseCommitContextBuilder::new()
            .with_coordinator(self.process.clone())
            .with_this_process(self.process.clone())
            .with_participants(participants)
            .build_coordinator()?;

        self.crashed = self.recorder.record(ThreePhaseCommitState::Init)? == Progress::Crashed
            || self.recorder.finish_batch() == Progress::Crashed;
        self.context = Some(context);

        Ok(())
    }

    /// Run the transaction until the coordinator decides or crashes.
    ///
    /// # Errors
    ///
    /// Returns an error if called before [`init`](Coordinator::init), if a collaborator fails,
    /// or if a participant violates the protocol.
    pub fn run(mut self) -> Result<Outcome<P>, RunError> {
        let mut context = self.context.take().ok_or_else(|| {
            InvalidStateError::with_message(format!(
                "coordinator {} must be initialized before it is run",
                self.process
            ))
        })?;

        if self.crashed {
            return Ok(self.recorder.crash_outcome());
        }

        let mut event = CoordinatorEvent::Start(self.value.clone());
        loop {
            let actions = self.algorithm.event(event, context.clone())?;
            if let Some(outcome) = self.apply(actions, &mut context)? {
                return Ok(outcome);
            }
            event = self.next_event(&context)?;
        }
    }

    // Returns the outcome once the coordinator has decided or crashed.
    fn apply(
        &mut self,
        actions: Vec<CoordinatorAction<P, V, TS::Time>>,
        context: &mut Context<P, TS::Time>,
    ) -> Result<Option<Outcome<P>>, RunError> {
        let mut decided = None;

        for action in actions {
            match action {
                CoordinatorAction::Update {
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
                CoordinatorAction::SendMessage(process, message) => {
                    debug!(
                        "Coordinator {} sending {} to {}",
                        self.process,
                        message.name(),
                        process
                    );
                    self.channel
                        .send_to(std::slice::from_ref(&process), message)?;
                }
                CoordinatorAction::Notify(notification) => match notification {
                    CoordinatorActionNotification::Commit(reason)
                    | CoordinatorActionNotification::Abort(reason) => decided = Some(reason),
                    CoordinatorActionNotification::MessageDropped(reason) => {
                        warn!("Coordinator {} dropped a message: {}", self.process, reason)
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
    ) -> Result<CoordinatorEvent<P, V>, RunError> {
        let alarm = (*context.alarm()).ok_or_else(|| {
            InvalidStateError::with_message(format!(
                "coordinator {} has nothing to wait for in state {:?}",
                self.process,
                context.state()
            ))
        })?;
        let timeout = alarm.duration_since_or_zero(self.time_source.now());

        match self.channel.receive_from_any(timeout)? {
            Some((process, message)) => {
                debug!(
                    "Coordinator {} received {} from {}",
                    self.process,
                    message.name(),
                    process
                );
                let message = CoordinatorMessage::try_from(message).map_err(|err| {
                    ProtocolViolationError::new(
                        err.expected().into(),
                        format!("{} from {}", err.received(), process),
                    )
                })?;
                Ok(CoordinatorEvent::Deliver(process, message))
            }
            None => Ok(CoordinatorEvent::Alarm()),
        }
    }
}

/// Builds a [`Coordinator`], joining the coordinator group and creating its stable log.
///
/// The channel, log factory, time source and value are required; timeouts default to
/// [`Timeouts::default`] and no faults are injected unless configured.
pub struct CoordinatorBuilder<P, V, C, F, TS>
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
    value: Option<V>,
}

impl<P, V, C, F, TS> CoordinatorBuilder<P, V, C, F, TS>
where
    P: Process,
    V: Value,
    C: Channel<P, ThreePhaseCommitMessage<V>>,
    F: StableLogFactory<P, TS::Time>,
    TS: TimeSource + Clone,
{
    pub fn new() -> Self {
        CoordinatorBuilder {
            _process_phantom: PhantomData,
            channel: None,
            faults: None,
            log_factory: None,
            time_source: None,
            timeouts: None,
            value: None,
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

    pub fn with_time_source(mut self, time_source: TS) -> Self {
        self.time_source = Some(time_source);
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = Some(timeouts);
        self
    }

    /// The value the participants are asked to vote on.
    pub fn with_value(mut self, value: V) -> Self {
        self.value = Some(value);
        self
    }

    /// # Errors
    ///
    /// Returns [`RunError::InvalidState`] if a required field is missing, or
    /// [`RunError::Internal`] if the channel cannot join the group or the log cannot be created.
    pub fn build(self) -> Result<Coordinator<P, V, C, F::Log, TS>, RunError> {
        let mut channel = self.channel.ok_or_else(|| {
            InvalidStateError::with_message("missing channel field".into())
        })?;
        let log_factory = self.log_factory.ok_or_else(|| {
            InvalidStateError::with_message("missing log_factory field".into())
        })?;
        let time_source = self.time_source.ok_or_else(|| {
            InvalidStateError::with_message("missing time_source field".into())
        })?;
        let value = self
            .value
            .ok_or_else(|| InvalidStateError::with_message("missing value field".into()))?;
        let timeouts = self.timeouts.unwrap_or_default();
        let faults = self.faults.unwrap_or_else(|| Box::new(NoFaults));

        let process = channel.join(COORDINATOR_GROUP)?;
        let log = log_factory.create_log(&format!("coordinator-{}", process))?;

        Ok(Coordinator {
            algorithm: CoordinatorAlgorithm::new(time_source.clone()).with_timeouts(timeouts),
            channel,
            context: None,
            crashed: false,
            process: process.clone(),
            recorder: StateRecorder::new(
                Role::Coordinator,
                process,
                log,
                time_source.clone(),
                faults,
            ),
            time_source,
            value,
        })
    }
}

impl<P, V, C, F, TS> Default for CoordinatorBuilder<P, V, C, F, TS>
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
