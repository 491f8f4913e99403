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

//! Drivers which run the three-phase commit algorithms over a [`Channel`](crate::links::Channel).
//!
//! A [`Coordinator`] and each [`Participant`] run as independent, single-threaded processes. Each
//! driver feeds events into its algorithm (a received message, an expired alarm, or the local
//! vote) and applies the actions the algorithm returns in order:
//!
//! - a context update whose state differs from the last logged one is written to the process's
//!   [`StableLog`](crate::stable_log::StableLog) before any following message is sent;
//! - messages are sent through the channel;
//! - a commit or abort notification ends the run with an [`Outcome`].
//!
//! The only blocking operation is the bounded receive, whose timeout is the time remaining
//! until the alarm set by the last context update.
//!
//! ```no_run
//! use std::thread;
//! use std::time::SystemTime;
//!
//! use tercet::algorithm::three_phase_commit::ThreePhaseCommitMessage;
//! use tercet::links::MemoryNetwork;
//! use tercet::runtime::{AlwaysCommit, CoordinatorBuilder, ParticipantBuilder};
//! use tercet::stable_log::MemoryStableLogFactory;
//! use tercet::SystemTimeFactory;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let network = MemoryNetwork::<ThreePhaseCommitMessage<String>>::new();
//! let logs = MemoryStableLogFactory::<u64, SystemTime>::new();
//!
//! let mut coordinator = CoordinatorBuilder::<u64, String, _, _, _>::new()
//!     .with_channel(network.channel())
//!     .with_log_factory(logs.clone())
//!     .with_time_source(SystemTimeFactory::new())
//!     .with_value("debit 10".to_string())
//!     .build()?;
//! let mut participant = ParticipantBuilder::<u64, String, _, _, _>::new()
//!     .with_channel(network.channel())
//!     .with_log_factory(logs.clone())
//!     .with_time_source(SystemTimeFactory::new())
//!     .with_local_work(AlwaysCommit)
//!     .build()?;
//!
//! coordinator.init()?;
//! participant.init()?;
//!
//! let participant = thread::spawn(move || participant.run().map_err(|e| e.to_string()));
//! println!("{}", coordinator.run()?);
//! println!("{}", participant.join().expect("participant panicked")?);
//! # Ok(())
//! # }
//! ```

mod coordinator;
mod fault;
mod outcome;
mod participant;
mod recorder;
mod work;

pub use coordinator::{Coordinator, CoordinatorBuilder};
pub use fault::{CrashAt, CrashPoint, FaultInjector, NoFaults, RandomCrash};
pub use outcome::{Outcome, Role};
pub use participant::{Participant, ParticipantBuilder};
pub use work::{AlwaysAbort, AlwaysCommit, LocalWork, RandomWork, DEFAULT_COMMIT_PROBABILITY};

/// The group joined by the coordinator.
pub const COORDINATOR_GROUP: &str = "coordinator";

/// The group joined by every participant.
pub const PARTICIPANT_GROUP: &str = "participant";
