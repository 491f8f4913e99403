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

use std::time::Duration;

/// The base timeout, in seconds, a participant waits on the coordinator.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;

/// The bounded waits of both roles.
///
/// The coordinator waits must be shorter than the participant waits: a coordinator that gives
/// up on a silent participant has to reach its decision before the other participants start to
/// suspect the coordinator itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Timeouts {
    vote: Duration,
    ready_commit: Duration,
    vote_request: Duration,
    decision: Duration,
    election: Duration,
}

impl Timeouts {
    /// Derives every wait from one base timeout.
    ///
    /// Participants wait `base`; the coordinator waits four fifths of it.
    pub fn from_base(base: Duration) -> Self {
        let coordinator = base - base / 5;
        Self {
            vote: coordinator,
            ready_commit: coordinator,
            vote_request: base,
            decision: base,
            election: base,
        }
    }

    /// Coordinator: how long to wait for every vote while in WAIT.
    pub fn vote(&self) -> Duration {
        self.vote
    }

    /// Coordinator: how long to wait for every `ReadyCommit` while in PRECOMMIT.
    pub fn ready_commit(&self) -> Duration {
        self.ready_commit
    }

    /// Participant: how long to wait for the `VoteRequest` while in INIT.
    pub fn vote_request(&self) -> Duration {
        self.vote_request
    }

    /// Participant: how long to wait for the coordinator while in READY or PRECOMMIT.
    pub fn decision(&self) -> Duration {
        self.decision
    }

    /// Participant: how long to wait for the successor coordinator's decision.
    pub fn election(&self) -> Duration {
        self.election
    }

    pub fn with_vote(mut self, timeout: Duration) -> Self {
        self.vote = timeout;
        self
    }

    pub fn with_ready_commit(mut self, timeout: Duration) -> Self {
        self.ready_commit = timeout;
        self
    }

    pub fn with_vote_request(mut self, timeout: Duration) -> Self {
        self.vote_request = timeout;
        self
    }

    pub fn with_decision(mut self, timeout: Duration) -> Self {
        self.decision = timeout;
        self
    }

    pub fn with_election(mut self, timeout: Duration) -> Self {
        self.election = timeout;
        self
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::from_base(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinator_waits_are_shorter() {
        let timeouts = Timeouts::default();

        assert_eq!(timeouts.decision(), Duration::from_secs(5));
        assert_eq!(timeouts.vote(), Duration::from_secs(4));
        assert!(timeouts.ready_commit() < timeouts.decision());
    }

    #[test]
    fn setters_override_one_wait() {
        let timeouts = Timeouts::from_base(Duration::from_millis(500))
            .with_election(Duration::from_secs(2));

        assert_eq!(timeouts.election(), Duration::from_secs(2));
        assert_eq!(timeouts.vote_request(), Duration::from_millis(500));
        assert_eq!(timeouts.vote(), Duration::from_millis(400));
    }
}
