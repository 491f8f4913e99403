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

//! An implementation of the 3PC (Three-Phase Commit) atomic commitment protocol.
//!
//! 3PC adds a PRECOMMIT phase between voting and the global decision of 2PC. A participant only
//! enters PRECOMMIT once the coordinator has seen a unanimous COMMIT vote, so a participant which
//! loses the coordinator can decide safely from its own last state:
//!
//! - READY: unanimity was never confirmed, abort;
//! - PRECOMMIT: unanimity was confirmed, commit.
//!
//! When the coordinator is suspected to have crashed, the participants elect the lowest process
//! as successor coordinator. The successor announces its state with a `Takeover` message and
//! then broadcasts the decision derived from that state.
//!
//! The protocol follows the non-blocking commit protocol described in:
//!
//! - Skeen, Nonblocking Commit Protocols, Proceedings of the 1981 ACM SIGMOD International
//!   Conference on Management of Data.

mod coordinator_action;
mod coordinator_algorithm;
mod coordinator_context;
mod coordinator_event;
mod coordinator_message;
mod decision;
mod election;
mod participant_action;
mod participant_algorithm;
mod participant_context;
mod participant_event;
mod participant_message;
mod timeouts;
mod unified_context;
mod unified_context_builder;
mod unified_message;
mod unified_state;

pub use coordinator_action::{CoordinatorAction, CoordinatorActionNotification};
pub use coordinator_algorithm::CoordinatorAlgorithm;
pub use coordinator_context::{CoordinatorContext, CoordinatorState, Participant};
pub use coordinator_event::CoordinatorEvent;
pub use coordinator_message::CoordinatorMessage;
pub use decision::{Decision, DecisionReason, Vote};
pub use election::{elect_successor, takeover_decision};
pub use participant_action::{ParticipantAction, ParticipantActionNotification};
pub use participant_algorithm::ParticipantAlgorithm;
pub use participant_context::{Election, ParticipantContext, ParticipantState};
pub use participant_event::ParticipantEvent;
pub use participant_message::ParticipantMessage;
pub use timeouts::{Timeouts, DEFAULT_TIMEOUT_SECONDS};
pub use unified_context::ThreePhaseCommitContext;
pub use unified_context_builder::ThreePhaseCommitContextBuilder;
pub use unified_message::ThreePhaseCommitMessage;
pub use unified_state::{ThreePhaseCommitState, UnknownStateError};
