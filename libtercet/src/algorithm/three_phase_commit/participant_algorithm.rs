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

use super::elect_successor;
use super::takeover_decision;
use super::Decision;
use super::DecisionReason;
use super::Election;
use super::ParticipantAction;
use super::ParticipantActionNotification;
use super::ParticipantContext;
use super::ParticipantEvent;
use super::ParticipantMessage;
use super::ParticipantState;
use super::ThreePhaseCommitContext;
use super::ThreePhaseCommitMessage;
use super::ThreePhaseCommitState;
use super::Timeouts;
use super::Vote;

type Context<P, T> = ThreePhaseCommitContext<P, T, ParticipantContext<P>>;

pub struct ParticipantAlgorithm<P, V, TS>
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

impl<P, V, TS> ParticipantAlgorithm<P, V, TS>
where
    P: Process,
    V: Value,
    TS: TimeSource,
{
    pub fn new(time_source: TS) -> Self {
        ParticipantAlgorithm {
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

    fn push_decision_actions(
        &self,
        mut context: Context<P, TS::Time>,
        decision: Decision,
        reason: DecisionReason<P>,
        actions: &mut Vec<ParticipantAction<P, V, TS::Time>>,
    ) {
        context.set_state(decided_state(decision));
        actions.push(ParticipantAction::Update {
            context,
            alarm: None,
        });
        actions.push(ParticipantAction::Notify(decision_notification(
            decision, reason,
        )));
    }

    // The coordinator timed out in Ready or PreCommit. Either this process is the successor and
    // decides right away, or it waits for the successor's decision.
    fn push_election_actions(
        &self,
        mut context: Context<P, TS::Time>,
        actions: &mut Vec<ParticipantAction<P, V, TS::Time>>,
    ) -> Result<(), AlgorithmError> {
        let this_process = context.this_process().clone();
        let prior_state = ThreePhaseCommitState::from(*context.state());

        let decision = takeover_decision(context.state()).ok_or_else(|| {
            InvalidStateError::with_message(format!(
                "election unexpected in {:?} state",
                context.state()
            ))
        })?;

        let successor = elect_successor(context.participant_processes())
            .cloned()
            .unwrap_or_else(|| this_process.clone());

        if successor != this_process {
            info!(
                "Participant {} suspects coordinator {} crashed in state {}; \
                waiting for successor {}",
                this_process,
                context.coordinator(),
                prior_state,
                successor
            );

            let election_timeout_end = self.time_source.now() + self.timeouts.election();
            context.set_election(Some(Election::Expected(successor)));
            actions.push(ParticipantAction::Update {
                context,
                alarm: Some(election_timeout_end),
            });
            return Ok(());
        }

        info!(
            "Participant {} is the successor coordinator, taking over in state {}",
            this_process, prior_state
        );

        let peers = context.peers().cloned().collect::<Vec<_>>();

        // The decision is recorded before anything is announced.
        context.set_state(decided_state(decision));
        actions.push(ParticipantAction::Update {
            context,
            alarm: None,
        });

        for peer in &peers {
            actions.push(ParticipantAction::SendMessage(
                peer.clone(),
                ThreePhaseCommitMessage::Takeover(prior_state),
            ));
        }

        let global_decision = match decision {
            Decision::Commit => ThreePhaseCommitMessage::GlobalCommit,
            Decision::Abort => ThreePhaseCommitMessage::GlobalAbort,
        };
        for peer in peers {
            actions.push(ParticipantAction::SendMessage(peer, global_decision.clone()));
        }

        actions.push(ParticipantAction::Notify(decision_notification(
            decision,
            DecisionReason::Takeover {
                successor: this_process,
                state: prior_state,
            },
        )));

        Ok(())
    }

    fn deliver_from_coordinator(
        &self,
        mut context: Context<P, TS::Time>,
        message: ParticipantMessage<V>,
    ) -> Result<Vec<ParticipantAction<P, V, TS::Time>>, AlgorithmError> {
        let coordinator = context.coordinator().clone();

        // Once the coordinator is suspected, only the successor decides.
        if let Some(election) = context.election() {
            return Ok(vec![ParticipantAction::Notify(
                ParticipantActionNotification::MessageDropped(format!(
                    "{} from suspected coordinator {} while following successor {}",
                    message.name(),
                    coordinator,
                    election.successor()
                )),
            )]);
        }

        let mut actions = Vec::new();

        match (*context.state(), message) {
            // Steps:
            //   - Update the state to WaitingForVote
            //   - Send a RequestForVote notification so the local work can decide
            (ParticipantState::Init, ParticipantMessage::VoteRequest(value)) => {
                context.set_state(ParticipantState::WaitingForVote);
                actions.push(ParticipantAction::Update {
                    context,
                    alarm: None,
                });
                actions.push(ParticipantAction::Notify(
                    ParticipantActionNotification::RequestForVote(value),
                ));
            }

            // Every participant voted commit. Record PreCommit, then acknowledge.
            (ParticipantState::Ready, ParticipantMessage::PrepareCommit) => {
                let decision_timeout_end = self.time_source.now() + self.timeouts.decision();

                context.set_state(ParticipantState::PreCommit);
                actions.push(ParticipantAction::Update {
                    context,
                    alarm: Some(decision_timeout_end),
                });
                actions.push(ParticipantAction::SendMessage(
                    coordinator,
                    ThreePhaseCommitMessage::ReadyCommit,
                ));
            }

            (
                ParticipantState::Ready | ParticipantState::PreCommit,
                ParticipantMessage::GlobalAbort,
            ) => self.push_decision_actions(
                context,
                Decision::Abort,
                DecisionReason::GlobalDecision(coordinator),
                &mut actions,
            ),

            (ParticipantState::PreCommit, ParticipantMessage::GlobalCommit) => self
                .push_decision_actions(
                    context,
                    Decision::Commit,
                    DecisionReason::GlobalDecision(coordinator),
                    &mut actions,
                ),

            (state, message) => {
                return Err(ProtocolViolationError::new(
                    expected_from_coordinator(state).into(),
                    format!("{} from coordinator {}", message.name(), coordinator),
                )
                .into())
            }
        }

        Ok(actions)
    }

    fn deliver_from_peer(
        &self,
        mut context: Context<P, TS::Time>,
        process: P,
        message: ParticipantMessage<V>,
    ) -> Result<Vec<ParticipantAction<P, V, TS::Time>>, AlgorithmError> {
        match (*context.state(), message) {
            // A successor announced its takeover. Defer to the first announcement, or to a lower
            // process if two successors race.
            (
                ParticipantState::Ready | ParticipantState::PreCommit,
                ParticipantMessage::Takeover(
                    announced @ (ThreePhaseCommitState::Ready | ThreePhaseCommitState::PreCommit),
                ),
            ) => {
                if let Some(Election::Announced { successor, .. }) = context.election() {
                    if process >= *successor {
                        return Ok(vec![ParticipantAction::Notify(
                            ParticipantActionNotification::MessageDropped(format!(
                                "takeover by {} ignored while following successor {}",
                                process, successor
                            )),
                        )]);
                    }
                }

                info!(
                    "Participant {} follows successor coordinator {} in state {}",
                    context.this_process(),
                    process,
                    announced
                );

                // The successor decides commit from PreCommit; adopt that state so the log
                // explains the commit that follows.
                if announced == ThreePhaseCommitState::PreCommit
                    && *context.state() == ParticipantState::Ready
                {
                    context.set_state(ParticipantState::PreCommit);
                }

                let election_timeout_end = self.time_source.now() + self.timeouts.election();
                context.set_election(Some(Election::Announced {
                    successor: process,
                    state: announced,
                }));

                Ok(vec![ParticipantAction::Update {
                    context,
                    alarm: Some(election_timeout_end),
                }])
            }

            (
                ParticipantState::Ready | ParticipantState::PreCommit,
                message @ (ParticipantMessage::GlobalCommit | ParticipantMessage::GlobalAbort),
            ) => {
                let reason = match context.election() {
                    Some(Election::Announced { successor, state }) if *successor == process => {
                        DecisionReason::Takeover {
                            successor: successor.clone(),
                            state: *state,
                        }
                    }
                    _ => {
                        return Ok(vec![ParticipantAction::Notify(
                            ParticipantActionNotification::MessageDropped(format!(
                                "{} from {}, which has not announced a takeover",
                                message.name(),
                                process
                            )),
                        )])
                    }
                };

                let decision = match message {
                    ParticipantMessage::GlobalCommit => Decision::Commit,
                    _ => Decision::Abort,
                };

                let mut actions = Vec::new();
                self.push_decision_actions(context, decision, reason, &mut actions);
                Ok(actions)
            }

            // A peer which lost the coordinator before this process even voted; the vote
            // request timeout settles this process on its own.
            (
                ParticipantState::New | ParticipantState::Init | ParticipantState::WaitingForVote,
                message @ (ParticipantMessage::Takeover(_)
                | ParticipantMessage::GlobalCommit
                | ParticipantMessage::GlobalAbort),
            ) => Ok(vec![ParticipantAction::Notify(
                ParticipantActionNotification::MessageDropped(format!(
                    "{} from {} received before voting",
                    message.name(),
                    process
                )),
            )]),

            (_, message) => Err(ProtocolViolationError::new(
                "Takeover(READY), Takeover(PRECOMMIT), GlobalCommit or GlobalAbort from a peer"
                    .into(),
                match message {
                    ParticipantMessage::Takeover(state) => {
                        format!("Takeover({}) from {}", state, process)
                    }
                    message => format!("{} from {}", message.name(), process),
                },
            )
            .into()),
        }
    }
}

impl<P, V, TS> Algorithm for ParticipantAlgorithm<P, V, TS>
where
    P: Process,
    V: Value,
    TS: TimeSource,
{
    type Event = ParticipantEvent<P, V>;
    type Action = ParticipantAction<P, V, TS::Time>;
    type Context = ThreePhaseCommitContext<P, TS::Time, ParticipantContext<P>>;

    fn event(
        &self,
        event: Self::Event,
        mut context: Self::Context,
    ) -> Result<Vec<Self::Action>, AlgorithmError> {
        match event {
            // Enter Init and start the vote request timeout.
            ParticipantEvent::Start() => {
                if !matches!(context.state(), ParticipantState::New) {
                    return Err(AlgorithmError::InvalidState(
                        InvalidStateError::with_message("Start event when not in New state".into()),
                    ));
                }

                let vote_request_timeout_end = self.time_source.now() + self.timeouts.vote_request();

                context.set_state(ParticipantState::Init);
                Ok(vec![ParticipantAction::Update {
                    context,
                    alarm: Some(vote_request_timeout_end),
                }])
            }

            ParticipantEvent::Alarm() => match *context.state() {
                // The coordinator never asked for a vote. No work was done, so aborting alone is
                // always safe and needs no election.
                ParticipantState::Init => {
                    info!(
                        "Participant {} received no VoteRequest from coordinator {}",
                        context.this_process(),
                        context.coordinator()
                    );

                    let mut actions = Vec::new();
                    self.push_decision_actions(
                        context,
                        Decision::Abort,
                        DecisionReason::NoVoteRequest,
                        &mut actions,
                    );
                    Ok(actions)
                }

                ParticipantState::Ready | ParticipantState::PreCommit => {
                    // A second timeout means the successor never decided.
                    if let Some(election) = context.election() {
                        return Ok(vec![ParticipantAction::Notify(
                            ParticipantActionNotification::ElectionFailed(
                                election.successor().clone(),
                            ),
                        )]);
                    }

                    let mut actions = Vec::new();
                    self.push_election_actions(context, &mut actions)?;
                    Ok(actions)
                }

                // No alarm is set in any other state; receiving one indicates a bug in the
                // caller.
                state => Err(AlgorithmError::InvalidState(
                    InvalidStateError::with_message(format!(
                        "Alarm unexpected in {:?} state",
                        state
                    )),
                )),
            },

            // In response to a RequestForVote, a Vote event carries the local decision.
            ParticipantEvent::Vote(vote) => {
                // If we receive a Vote event when not in WaitingForVote, it indicates
                // a programming error by the caller of the algorithm.
                if !matches!(context.state(), ParticipantState::WaitingForVote) {
                    return Err(AlgorithmError::InvalidState(
                        InvalidStateError::with_message(
                            "Vote event when not in WaitingForVote state".into(),
                        ),
                    ));
                }

                let coordinator = context.coordinator().clone();
                let mut actions = Vec::new();

                match vote {
                    Vote::Commit => {
                        let decision_timeout_end =
                            self.time_source.now() + self.timeouts.decision();

                        context.set_state(ParticipantState::Ready);
                        actions.push(ParticipantAction::Update {
                            context,
                            alarm: Some(decision_timeout_end),
                        });
                        actions.push(ParticipantAction::SendMessage(
                            coordinator,
                            ThreePhaseCommitMessage::VoteCommit,
                        ));
                    }
                    Vote::Abort => {
                        context.set_state(ParticipantState::Abort);
                        actions.push(ParticipantAction::Update {
                            context,
                            alarm: None,
                        });
                        actions.push(ParticipantAction::SendMessage(
                            coordinator,
                            ThreePhaseCommitMessage::VoteAbort,
                        ));
                        actions.push(ParticipantAction::Notify(
                            ParticipantActionNotification::Abort(DecisionReason::LocalAbort),
                        ));
                    }
                }

                Ok(actions)
            }

            ParticipantEvent::Deliver(process, message) => {
                // Once decided, nothing changes the decision.
                if matches!(
                    context.state(),
                    ParticipantState::Commit | ParticipantState::Abort
                ) {
                    return Ok(vec![ParticipantAction::Notify(
                        ParticipantActionNotification::MessageDropped(format!(
                            "{} from {} received after the decision was made",
                            message.name(),
                            process
                        )),
                    )]);
                }

                if process == *context.coordinator() {
                    self.deliver_from_coordinator(context, message)
                } else if context.peers().any(|peer| *peer == process) {
                    self.deliver_from_peer(context, process, message)
                } else {
                    Ok(vec![ParticipantAction::Notify(
                        ParticipantActionNotification::MessageDropped(
                            "sender process is not the coordinator or a participant".into(),
                        ),
                    )])
                }
            }
        }
    }
}

fn decided_state(decision: Decision) -> ParticipantState {
    match decision {
        Decision::Commit => ParticipantState::Commit,
        Decision::Abort => ParticipantState::Abort,
    }
}

fn decision_notification<P, V>(
    decision: Decision,
    reason: DecisionReason<P>,
) -> ParticipantActionNotification<P, V>
where
    P: Process,
    V: Value,
{
    match decision {
        Decision::Commit => ParticipantActionNotification::Commit(reason),
        Decision::Abort => ParticipantActionNotification::Abort(reason),
    }
}

fn expected_from_coordinator(state: ParticipantState) -> &'static str {
    match state {
        ParticipantState::New => "no message before Start",
        ParticipantState::Init => "VoteRequest",
        ParticipantState::WaitingForVote => "no message while voting",
        ParticipantState::Ready => "PrepareCommit or GlobalAbort",
        ParticipantState::PreCommit => "GlobalCommit or GlobalAbort",
        ParticipantState::Commit | ParticipantState::Abort => "no message after the decision",
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use crate::time::SystemTimeFactory;

    use super::super::ThreePhaseCommitContextBuilder;
    use super::*;

    type Action = ParticipantAction<u64, String, SystemTime>;

    fn algorithm() -> ParticipantAlgorithm<u64, String, SystemTimeFactory> {
        ParticipantAlgorithm::new(SystemTimeFactory::new())
    }

    fn context(this_process: u64, state: ThreePhaseCommitState) -> Context<u64, SystemTime> {
        ThreePhaseCommitContextBuilder::new()
            .with_coordinator(0)
            .with_this_process(this_process)
            .with_participants(vec![1, 2, 3])
            .with_state(state)
            .build_participant()
            .unwrap()
    }

    fn last_context(actions: &[Action]) -> Context<u64, SystemTime> {
        actions
            .iter()
            .rev()
            .find_map(|action| match action {
                ParticipantAction::Update { context, alarm } => {
                    let mut context = context.clone();
                    context.set_alarm(*alarm);
                    Some(context)
                }
                _ => None,
            })
            .expect("no update action")
    }

    fn sent(actions: &[Action]) -> Vec<(u64, ThreePhaseCommitMessage<String>)> {
        actions
            .iter()
            .filter_map(|action| match action {
                ParticipantAction::SendMessage(p, m) => Some((*p, m.clone())),
                _ => None,
            })
            .collect()
    }

    fn is_dropped(actions: &[Action]) -> bool {
        matches!(
            actions,
            [ParticipantAction::Notify(
                ParticipantActionNotification::MessageDropped(_)
            )]
        )
    }

    #[test]
    fn start_enters_init_with_alarm() {
        let context = ThreePhaseCommitContextBuilder::new()
            .with_coordinator(0)
            .with_this_process(1)
            .with_participants(vec![1, 2])
            .build_participant()
            .unwrap();

        let actions = algorithm().event(ParticipantEvent::Start(), context).unwrap();

        assert_eq!(actions.len(), 1);
        let context = last_context(&actions);
        assert_eq!(*context.state(), ParticipantState::Init);
        assert!(context.alarm().is_some());
    }

    /// A VoteRequest asks the local work for a vote; a commit vote is recorded as Ready before
    /// it is sent.
    #[test]
    fn vote_request_then_commit_vote() {
        let algorithm = algorithm();

        let actions = algorithm
            .event(
                ParticipantEvent::Deliver(0, ParticipantMessage::VoteRequest("tx".into())),
                context(1, ThreePhaseCommitState::Init),
            )
            .unwrap();
        let context = last_context(&actions);
        assert_eq!(*context.state(), ParticipantState::WaitingForVote);
        assert!(context.alarm().is_none());
        assert_eq!(
            actions.last(),
            Some(&ParticipantAction::Notify(
                ParticipantActionNotification::RequestForVote("tx".into())
            ))
        );

        let actions = algorithm
            .event(ParticipantEvent::Vote(Vote::Commit), context)
            .unwrap();
        assert!(matches!(
            &actions[0],
            ParticipantAction::Update { context, alarm: Some(_) }
                if *context.state() == ParticipantState::Ready
        ));
        assert_eq!(sent(&actions), vec![(0, ThreePhaseCommitMessage::VoteCommit)]);
    }

    #[test]
    fn abort_vote_aborts_locally() {
        let algorithm = algorithm();
        let actions = algorithm
            .event(
                ParticipantEvent::Deliver(0, ParticipantMessage::VoteRequest("tx".into())),
                context(1, ThreePhaseCommitState::Init),
            )
            .unwrap();

        let actions = algorithm
            .event(ParticipantEvent::Vote(Vote::Abort), last_context(&actions))
            .unwrap();

        assert_eq!(*last_context(&actions).state(), ParticipantState::Abort);
        assert_eq!(sent(&actions), vec![(0, ThreePhaseCommitMessage::VoteAbort)]);
        assert_eq!(
            actions.last(),
            Some(&ParticipantAction::Notify(
                ParticipantActionNotification::Abort(DecisionReason::LocalAbort)
            ))
        );
    }

    #[test]
    fn vote_outside_waiting_for_vote_is_invalid() {
        let result = algorithm().event(
            ParticipantEvent::Vote(Vote::Commit),
            context(1, ThreePhaseCommitState::Ready),
        );

        assert!(matches!(result, Err(AlgorithmError::InvalidState(_))));
    }

    /// Without a VoteRequest the participant aborts alone and tells nobody.
    #[test]
    fn missing_vote_request_aborts_without_election() {
        let actions = algorithm()
            .event(
                ParticipantEvent::Alarm(),
                context(1, ThreePhaseCommitState::Init),
            )
            .unwrap();

        assert_eq!(*last_context(&actions).state(), ParticipantState::Abort);
        assert!(sent(&actions).is_empty());
        assert_eq!(
            actions.last(),
            Some(&ParticipantAction::Notify(
                ParticipantActionNotification::Abort(DecisionReason::NoVoteRequest)
            ))
        );
    }

    #[test]
    fn prepare_commit_is_acknowledged() {
        let actions = algorithm()
            .event(
                ParticipantEvent::Deliver(0, ParticipantMessage::PrepareCommit),
                context(2, ThreePhaseCommitState::Ready),
            )
            .unwrap();

        let context = last_context(&actions);
        assert_eq!(*context.state(), ParticipantState::PreCommit);
        assert!(context.alarm().is_some());
        assert_eq!(sent(&actions), vec![(0, ThreePhaseCommitMessage::ReadyCommit)]);
    }

    #[test]
    fn coordinator_decisions_are_followed() {
        let actions = algorithm()
            .event(
                ParticipantEvent::Deliver(0, ParticipantMessage::GlobalCommit),
                context(2, ThreePhaseCommitState::PreCommit),
            )
            .unwrap();
        assert_eq!(*last_context(&actions).state(), ParticipantState::Commit);
        assert_eq!(
            actions.last(),
            Some(&ParticipantAction::Notify(
                ParticipantActionNotification::Commit(DecisionReason::GlobalDecision(0))
            ))
        );

        let actions = algorithm()
            .event(
                ParticipantEvent::Deliver(0, ParticipantMessage::GlobalAbort),
                context(2, ThreePhaseCommitState::Ready),
            )
            .unwrap();
        assert_eq!(*last_context(&actions).state(), ParticipantState::Abort);
    }

    /// Committing straight from Ready would skip the phase that makes 3PC non-blocking.
    #[test]
    fn global_commit_in_ready_is_a_protocol_violation() {
        let result = algorithm().event(
            ParticipantEvent::Deliver(0, ParticipantMessage::GlobalCommit),
            context(2, ThreePhaseCommitState::Ready),
        );

        match result {
            Err(AlgorithmError::ProtocolViolation(err)) => {
                assert_eq!(err.expected(), "PrepareCommit or GlobalAbort");
                assert_eq!(err.received(), "GlobalCommit from coordinator 0");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    /// The lowest participant takes over from Ready: it records Abort, announces its state to
    /// every peer, then sends the decision.
    #[test]
    fn successor_aborts_from_ready() {
        let actions = algorithm()
            .event(
                ParticipantEvent::Alarm(),
                context(1, ThreePhaseCommitState::Ready),
            )
            .unwrap();

        assert!(matches!(
            &actions[0],
            ParticipantAction::Update { context, alarm: None }
                if *context.state() == ParticipantState::Abort
        ));
        assert_eq!(
            sent(&actions),
            vec![
                (
                    2,
                    ThreePhaseCommitMessage::Takeover(ThreePhaseCommitState::Ready)
                ),
                (
                    3,
                    ThreePhaseCommitMessage::Takeover(ThreePhaseCommitState::Ready)
                ),
                (2, ThreePhaseCommitMessage::GlobalAbort),
                (3, ThreePhaseCommitMessage::GlobalAbort),
            ]
        );
        assert_eq!(
            actions.last(),
            Some(&ParticipantAction::Notify(
                ParticipantActionNotification::Abort(DecisionReason::Takeover {
                    successor: 1,
                    state: ThreePhaseCommitState::Ready,
                })
            ))
        );
    }

    #[test]
    fn successor_commits_from_precommit() {
        let actions = algorithm()
            .event(
                ParticipantEvent::Alarm(),
                context(1, ThreePhaseCommitState::PreCommit),
            )
            .unwrap();

        assert_eq!(*last_context(&actions).state(), ParticipantState::Commit);
        assert_eq!(
            sent(&actions)[2..],
            [
                (2, ThreePhaseCommitMessage::GlobalCommit),
                (3, ThreePhaseCommitMessage::GlobalCommit),
            ]
        );
    }

    /// Every other participant waits for the successor instead of deciding.
    #[test]
    fn non_successor_waits_for_successor() {
        let actions = algorithm()
            .event(
                ParticipantEvent::Alarm(),
                context(2, ThreePhaseCommitState::Ready),
            )
            .unwrap();

        assert_eq!(actions.len(), 1);
        let context = last_context(&actions);
        assert_eq!(*context.state(), ParticipantState::Ready);
        assert_eq!(*context.election(), Some(Election::Expected(1)));
        assert!(context.alarm().is_some());
    }

    /// An announced PreCommit moves a Ready participant to PreCommit before the commit arrives.
    #[test]
    fn follows_announced_precommit() {
        let algorithm = algorithm();

        let actions = algorithm
            .event(
                ParticipantEvent::Deliver(
                    1,
                    ParticipantMessage::Takeover(ThreePhaseCommitState::PreCommit),
                ),
                context(3, ThreePhaseCommitState::Ready),
            )
            .unwrap();
        let context = last_context(&actions);
        assert_eq!(*context.state(), ParticipantState::PreCommit);
        assert_eq!(
            *context.election(),
            Some(Election::Announced {
                successor: 1,
                state: ThreePhaseCommitState::PreCommit,
            })
        );

        let actions = algorithm
            .event(
                ParticipantEvent::Deliver(1, ParticipantMessage::GlobalCommit),
                context,
            )
            .unwrap();
        assert_eq!(*last_context(&actions).state(), ParticipantState::Commit);
        assert_eq!(
            actions.last(),
            Some(&ParticipantAction::Notify(
                ParticipantActionNotification::Commit(DecisionReason::Takeover {
                    successor: 1,
                    state: ThreePhaseCommitState::PreCommit,
                })
            ))
        );
    }

    /// Between two announcing successors the lower process wins, whatever the arrival order.
    #[test]
    fn lower_successor_wins_announcement_race() {
        let algorithm = algorithm();

        let actions = algorithm
            .event(
                ParticipantEvent::Deliver(
                    2,
                    ParticipantMessage::Takeover(ThreePhaseCommitState::Ready),
                ),
                context(3, ThreePhaseCommitState::Ready),
            )
            .unwrap();
        let context = last_context(&actions);

        let actions = algorithm
            .event(
                ParticipantEvent::Deliver(
                    1,
                    ParticipantMessage::Takeover(ThreePhaseCommitState::Ready),
                ),
                context.clone(),
            )
            .unwrap();
        let lower = last_context(&actions);
        assert_eq!(lower.election().as_ref().map(Election::successor), Some(&1));

        // A decision from the displaced successor is ignored.
        let actions = algorithm
            .event(
                ParticipantEvent::Deliver(2, ParticipantMessage::GlobalAbort),
                lower.clone(),
            )
            .unwrap();
        assert!(is_dropped(&actions));

        // A later announcement from a higher process is ignored too.
        let actions = algorithm
            .event(
                ParticipantEvent::Deliver(
                    2,
                    ParticipantMessage::Takeover(ThreePhaseCommitState::Ready),
                ),
                lower,
            )
            .unwrap();
        assert!(is_dropped(&actions));
    }

    #[test]
    fn coordinator_is_ignored_once_suspected() {
        let algorithm = algorithm();
        let actions = algorithm
            .event(
                ParticipantEvent::Alarm(),
                context(2, ThreePhaseCommitState::PreCommit),
            )
            .unwrap();

        let actions = algorithm
            .event(
                ParticipantEvent::Deliver(0, ParticipantMessage::GlobalCommit),
                last_context(&actions),
            )
            .unwrap();

        assert!(is_dropped(&actions));
    }

    #[test]
    fn decision_without_announcement_is_dropped() {
        let actions = algorithm()
            .event(
                ParticipantEvent::Deliver(1, ParticipantMessage::GlobalCommit),
                context(3, ThreePhaseCommitState::PreCommit),
            )
            .unwrap();

        assert!(is_dropped(&actions));
    }

    /// A second alarm while waiting for the successor reports the failed election.
    #[test]
    fn silent_successor_fails_election() {
        let algorithm = algorithm();
        let actions = algorithm
            .event(
                ParticipantEvent::Alarm(),
                context(3, ThreePhaseCommitState::Ready),
            )
            .unwrap();

        let actions = algorithm
            .event(ParticipantEvent::Alarm(), last_context(&actions))
            .unwrap();

        assert_eq!(
            actions,
            vec![ParticipantAction::Notify(
                ParticipantActionNotification::ElectionFailed(1)
            )]
        );
    }

    #[test]
    fn terminal_states_drop_messages() {
        for state in [ThreePhaseCommitState::Commit, ThreePhaseCommitState::Abort] {
            let actions = algorithm()
                .event(
                    ParticipantEvent::Deliver(0, ParticipantMessage::GlobalAbort),
                    context(2, state),
                )
                .unwrap();

            assert!(is_dropped(&actions));
        }
    }

    #[test]
    fn unknown_sender_is_dropped() {
        let actions = algorithm()
            .event(
                ParticipantEvent::Deliver(9, ParticipantMessage::PrepareCommit),
                context(2, ThreePhaseCommitState::Ready),
            )
            .unwrap();

        assert!(is_dropped(&actions));
    }

    #[test]
    fn peer_vote_request_is_a_protocol_violation() {
        let result = algorithm().event(
            ParticipantEvent::Deliver(1, ParticipantMessage::VoteRequest("tx".into())),
            context(2, ThreePhaseCommitState::Ready),
        );

        assert!(matches!(result, Err(AlgorithmError::ProtocolViolation(_))));
    }

    #[test]
    fn second_vote_request_is_a_protocol_violation() {
        let result = algorithm().event(
            ParticipantEvent::Deliver(0, ParticipantMessage::VoteRequest("tx".into())),
            context(2, ThreePhaseCommitState::Ready),
        );

        match result {
            Err(AlgorithmError::ProtocolViolation(err)) => {
                assert_eq!(err.expected(), "PrepareCommit or GlobalAbort");
                assert_eq!(err.received(), "VoteRequest from coordinator 0");
            }
            other => panic!("expected a protocol violation, got {:?}", other),
        }
    }
}
