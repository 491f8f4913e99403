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

//! The successor election used when the coordinator is suspected to have crashed.
//!
//! Both rules only depend on state every participant already holds: the participant set known
//! at init time, and the participant's own last logged state. No process ever asks the crashed
//! coordinator anything.

use crate::process::Process;

use super::Decision;
use super::ParticipantState;

/// Returns the participant which becomes the successor coordinator: the lowest process.
///
/// Returns `None` only for an empty participant set.
pub fn elect_successor<P>(participants: &[P]) -> Option<&P>
where
    P: Process,
{
    participants.iter().min()
}

/// Returns the decision a successor coordinator takes from its own state.
///
/// From READY no process can be sure everyone voted commit, so the safe decision is abort.
/// PRECOMMIT proves the coordinator saw a unanimous commit vote, so the safe decision is commit.
/// No other state can take over.
pub fn takeover_decision(state: &ParticipantState) -> Option<Decision> {
    match state {
        ParticipantState::Ready => Some(Decision::Abort),
        ParticipantState::PreCommit => Some(Decision::Commit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowest_process_is_elected() {
        assert_eq!(elect_successor(&[3u64, 1, 2]), Some(&1));
        assert_eq!(elect_successor(&[7u64]), Some(&7));
        assert_eq!(elect_successor::<u64>(&[]), None);
    }

    /// The elected process does not depend on the order in which members were discovered.
    #[test]
    fn election_is_independent_of_order() {
        let a = vec!["p2".to_string(), "p1".to_string(), "p3".to_string()];
        let b = vec!["p3".to_string(), "p2".to_string(), "p1".to_string()];

        assert_eq!(elect_successor(&a), elect_successor(&b));
        assert_eq!(elect_successor(&a).map(String::as_str), Some("p1"));
    }

    #[test]
    fn decision_follows_phase() {
        assert_eq!(
            takeover_decision(&ParticipantState::Ready),
            Some(Decision::Abort)
        );
        assert_eq!(
            takeover_decision(&ParticipantState::PreCommit),
            Some(Decision::Commit)
        );
        assert_eq!(takeover_decision(&ParticipantState::Init), None);
        assert_eq!(takeover_decision(&ParticipantState::Commit), None);
    }
}
