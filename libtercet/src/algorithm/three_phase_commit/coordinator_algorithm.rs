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

use std::marker::PhantomData;

use crate::algorithm::{Algorithm, Value};
use crate::error::{AlgorithmError, InvalidStateError, ProtocolViolationError};
use crate::process::Process;
use crate::time::TimeSource;

use super::CoordinatorAction;
use super::CoordinatorActionNotification;
use super::CoordinatorContext;
use super::CoordinatorEvent;
use super::CoordinatorMessage;
use super::CoordinatorState;
use super::DecisionReason;
use super::ThreePhaseCommitContext;
use super::ThreePhaseCommitMessage;
use super::Timeouts;
use super::Vote;

type Context<P, T> = ThreePhaseCommitContext<P, T, CoordinatorContext<P>>;

pub struct CoordinatorAlgorithm<P, V, TS>
where
    P: Process,
    V: Value,
    TS: TimeSource,
{
    _process_phantom: PhantomData<P>,
    _value_phantom: PhantomData<V>,
    time_source: TS,
    timeouts: Timeouts,
}

impl<P, V, TS> CoordinatorAlgorithm<P, V, TS>
where
    P: Process,
    V: Value,
    TS: TimeSource,
{
    pub fn new(time_source: TS) -> Self {
        CoordinatorAlgorithm {
            _process_phantom: PhantomData,
            _value_phantom: PhantomData,
            time_source,
            timeouts: Timeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    // Create actions for an abort decision. An abort occurs when:
    //
    // - a participant votes abort while we are in Wait
    // - the vote timeout expires before every participant has voted
    fn push_abort_actions(
        &self,
        mut context: Context<P, TS::Time>,
        reason: DecisionReason<P>,
        actions: &mut Vec<CoordinatorAction<P, V, TS::Time>>,
    ) {
        // The order of actions here is important! We must update our state to `Abort` before we
        // send any messages for correctness of the algorithm.
        context.set_state(CoordinatorState::Abort);
        actions.push(CoordinatorAction::Update {
            context: context.clone(),
            alarm: None,
        });

        for participant in context.participants() {
            actions.push(CoordinatorAction::SendMessage(
                participant.process.clone(),
                ThreePhaseCommitMessage::GlobalAbort,
            ));
        }

        actions.push(CoordinatorAction::Notify(
            CoordinatorActionNotification::Abort(reason),
        ));
    }

    // Create actions for entering PreCommit once every participant has voted commit.
    fn push_precommit_actions(
        &self,
        mut context: Context<P, TS::Time>,
        actions: &mut Vec<CoordinatorAction<P, V, TS::Time>>,
    ) {
        if context.participants().is_empty() {
            // Nobody to prepare; unanimity is vacuous.
            self.push_commit_actions(context, actions);
            return;
        }

        // Every participant has to acknowledge within the ack timeout, starting now.
        let ready_commit_timeout_end = self.time_source.now() + self.timeouts.ready_commit();

        context.set_state(CoordinatorState::PreCommit);
        actions.push(CoordinatorAction::Update {
            context: context.clone(),
            alarm: Some(ready_commit_timeout_end),
        });

        for participant in context.participants() {
            actions.push(CoordinatorAction::SendMessage(
                participant.process.clone(),
                ThreePhaseCommitMessage::PrepareCommit,
            ));
        }
    }

    // Create actions for the commit decision. Only reachable from PreCommit.
    fn push_commit_actions(
        &self,
        mut context: Context<P, TS::Time>,
        actions: &mut Vec<CoordinatorAction<P, V, TS::Time>>,
    ) {
        context.set_state(CoordinatorState::Commit);
        actions.push(CoordinatorAction::Update {
            context: context.clone(),
            alarm: None,
        });

        for participant in context.participants() {
            actions.push(CoordinatorAction::SendMessage(
                participant.process.clone(),
                ThreePhaseCommitMessage::GlobalCommit,
            ));
        }

        actions.push(CoordinatorAction::Notify(
            CoordinatorActionNotification::Commit(DecisionReason::AllVotedCommit),
        ));
    }

    fn handle_vote(
        &self,
        mut context: Context<P, TS::Time>,
        process: P,
        vote: Vote,
    ) -> Vec<CoordinatorAction<P, V, TS::Time>> {
        let alarm = *context.alarm();

        let participant = match context
            .participants_mut()
            .iter_mut()
            .find(|participant| participant.process == process)
        {
            Some(inner) => inner,
            None => {
                return vec![CoordinatorAction::Notify(
                    CoordinatorActionNotification::MessageDropped(
                        "sender process is not a participant".into(),
                    ),
                )];
            }
        };

        // Ignore if this participant already voted. This should not occur in normal operation.
        if participant.vote.is_some() {
            return vec![CoordinatorAction::Notify(
                CoordinatorActionNotification::MessageDropped(
                    "participant has already voted".into(),
                ),
            )];
        }

        participant.vote = Some(vote);

        let mut actions = Vec::new();

        // A single abort vote decides the transaction; nothing else needs to be recorded.
        if vote == Vote::Abort {
            self.push_abort_actions(context, DecisionReason::VotedAbort(process), &mut actions);
            return actions;
        }

        actions.push(CoordinatorAction::Update {
            context: context.clone(),
            alarm,
        });

        if context
            .participants()
            .iter()
            .all(|p| p.vote == Some(Vote::Commit))
        {
            self.push_precommit_actions(context, &mut actions);
        }

        actions
    }

    fn handle_ready_commit(
        &self,
        mut context: Context<P, TS::Time>,
        process: P,
    ) -> Vec<CoordinatorAction<P, V, TS::Time>> {
        let alarm = *context.alarm();

        let participant = match context
            .participants_mut()
            .iter_mut()
            .find(|participant| participant.process == process)
        {
            Some(inner) => inner,
            None => {
                return vec![CoordinatorAction::Notify(
                    CoordinatorActionNotification::MessageDropped(
                        "sender process is not a participant".into(),
                    ),
                )];
            }
        };

        if participant.ready_commit {
            return vec![CoordinatorAction::Notify(
                CoordinatorActionNotification::MessageDropped(
                    "participant has already acknowledged PrepareCommit".into(),
                ),
            )];
        }

        participant.ready_commit = true;

        let mut actions = vec![CoordinatorAction::Update {
            context: context.clone(),
            alarm,
        }];

        if context.participants().iter().all(|p| p.ready_commit) {
            self.push_commit_actions(context, &mut actions);
        }

        actions
    }
}

impl<P, V, TS> Algorithm for CoordinatorAlgorithm<P, V, TS>
where
    P: Process,
    V: Value,
    TS: TimeSource,
{
    type Event = CoordinatorEvent<P, V>;
    type Action = CoordinatorAction<P, V, TS::Time>;
    type Context = ThreePhaseCommitContext<P, TS::Time, CoordinatorContext<P>>;

    fn event(
        &self,
        event: Self::Event,
        mut context: Self::Context,
    ) -> Result<Vec<Self::Action>, AlgorithmError> {
        match event {
            // A Start event provides the value the participants vote on.
            //
            // Steps:
            //   - Update the state to Wait and set the vote timeout alarm
            //   - Send VoteRequest to all participants
            CoordinatorEvent::Start(value) => {
                if !matches!(context.state(), CoordinatorState::Init) {
                    return Err(AlgorithmError::InvalidState(
                        InvalidStateError::with_message(
                            "Start event when not in Init state".into(),
                        ),
                    ));
                }

                let mut actions = Vec::new();

                let vote_timeout_end = self.time_source.now() + self.timeouts.vote();

                // Wait is recorded before any VoteRequest leaves so that a crash after this
                // point is always explained by the last logged state.
                context.set_state(CoordinatorState::Wait);
                actions.push(CoordinatorAction::Update {
                    context: context.clone(),
                    alarm: Some(vote_timeout_end),
                });

                for participant in context.participants() {
                    actions.push(CoordinatorAction::SendMessage(
                        participant.process.clone(),
                        ThreePhaseCommitMessage::VoteRequest(value.clone()),
                    ));
                }

                if context.participants().is_empty() {
                    self.push_precommit_actions(context, &mut actions);
                }

                Ok(actions)
            }

            CoordinatorEvent::Alarm() => match *context.state() {
                // Not every participant voted in time. Any of them may have crashed before doing
                // its work, so the only safe decision is abort.
                CoordinatorState::Wait => {
                    let silent = context
                        .participants()
                        .iter()
                        .filter(|p| p.vote.is_none())
                        .map(|p| p.process.clone())
                        .collect();

                    let mut actions = Vec::new();
                    self.push_abort_actions(
                        context,
                        DecisionReason::VoteTimeout(silent),
                        &mut actions,
                    );
                    Ok(actions)
                }

                // Every participant already voted commit, so a silent participant cannot force
                // an abort. Exclude it and decide commit.
                CoordinatorState::PreCommit => {
                    for participant in context.participants().iter().filter(|p| !p.ready_commit) {
                        warn!(
                            "Participant {} did not acknowledge PrepareCommit; suspected crashed, \
                            proceeding to commit",
                            participant.process
                        );
                    }

                    let mut actions = Vec::new();
                    self.push_commit_actions(context, &mut actions);
                    Ok(actions)
                }

                // Alarms are only set in Wait and PreCommit; receiving one in any other state
                // indicates a bug in the caller.
                state => Err(AlgorithmError::InvalidState(
                    InvalidStateError::with_message(format!(
                        "Alarm unexpected in {:?} state",
                        state
                    )),
                )),
            },

            CoordinatorEvent::Deliver(process, message) => match (*context.state(), message) {
                // Once decided, nothing changes the decision.
                (CoordinatorState::Commit | CoordinatorState::Abort, message) => {
                    Ok(vec![CoordinatorAction::Notify(
                        CoordinatorActionNotification::MessageDropped(format!(
                            "{} received after the decision was made",
                            message.name()
                        )),
                    )])
                }

                (CoordinatorState::Wait, CoordinatorMessage::VoteCommit) => {
                    Ok(self.handle_vote(context, process, Vote::Commit))
                }

                (CoordinatorState::Wait, CoordinatorMessage::VoteAbort) => {
                    Ok(self.handle_vote(context, process, Vote::Abort))
                }

                // Every participant has voted by now, so this is a duplicate and is dropped.
                (CoordinatorState::PreCommit, CoordinatorMessage::VoteCommit) => {
                    Ok(self.handle_vote(context, process, Vote::Commit))
                }

                (CoordinatorState::PreCommit, CoordinatorMessage::ReadyCommit) => {
                    Ok(self.handle_ready_commit(context, process))
                }

                (state, message) => Err(ProtocolViolationError::new(
                    expected_in(state).into(),
                    format!("{} from {}", message.name(), process),
                )
                .into()),
            },
        }
    }
}

fn expected_in(state: CoordinatorState) -> &'static str {
    match state {
        CoordinatorState::Init => "no message before VoteRequest is sent",
        CoordinatorState::Wait => "VoteCommit or VoteAbort",
        CoordinatorState::PreCommit => "ReadyCommit",
        CoordinatorState::Commit | CoordinatorState::Abort => "no message after the decision",
    }
}
