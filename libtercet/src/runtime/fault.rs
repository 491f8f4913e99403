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

//! Simulated crashes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::algorithm::three_phase_commit::ThreePhaseCommitState;

use super::work::clamp_probability;

/// A point in a process's life at which it may crash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrashPoint {
    /// Before the state is written to the stable log. Nothing that depends on the state has been
    /// sent.
    BeforeEnter(ThreePhaseCommitState),

    /// After the state is written to the stable log and every message sent on entering it has
    /// gone out.
    AfterEnter(ThreePhaseCommitState),
}

/// Decides whether a process crashes at a given point.
///
/// A crashed process stops immediately: it sends nothing further and its run reports the last
/// logged state.
pub trait FaultInjector {
    fn should_crash(&mut self, point: &CrashPoint) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoFaults;

impl FaultInjector for NoFaults {
    fn should_crash(&mut self, _point: &CrashPoint) -> bool {
        false
    }
}

/// Crashes when the given point is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrashAt(pub CrashPoint);

impl FaultInjector for CrashAt {
    fn should_crash(&mut self, point: &CrashPoint) -> bool {
        self.0 == *point
    }
}

/// Crashes at each point with a fixed probability.
pub struct RandomCrash<R: Rng = StdRng> {
    probability: f64,
    rng: R,
}

impl RandomCrash<StdRng> {
    pub fn new(probability: f64) -> Self {
        Self::with_rng(probability, StdRng::from_entropy())
    }

    pub fn with_seed(probability: f64, seed: u64) -> Self {
        Self::with_rng(probability, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomCrash<R> {
    pub fn with_rng(probability: f64, rng: R) -> Self {
        RandomCrash {
            probability: clamp_probability(probability),
            rng,
        }
    }
}

impl<R: Rng> FaultInjector for RandomCrash<R> {
    fn should_crash(&mut self, _point: &CrashPoint) -> bool {
        self.rng.gen_bool(self.probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crash_at_matches_only_its_point() {
        let mut faults = CrashAt(CrashPoint::AfterEnter(ThreePhaseCommitState::PreCommit));

        assert!(!faults.should_crash(&CrashPoint::BeforeEnter(ThreePhaseCommitState::PreCommit)));
        assert!(!faults.should_crash(&CrashPoint::AfterEnter(ThreePhaseCommitState::Wait)));
        assert!(faults.should_crash(&CrashPoint::AfterEnter(ThreePhaseCommitState::PreCommit)));
    }

    #[test]
    fn random_crash_extremes() {
        let point = CrashPoint::BeforeEnter(ThreePhaseCommitState::Ready);

        assert!(RandomCrash::with_seed(1.0, 3).should_crash(&point));
        assert!(!RandomCrash::with_seed(0.0, 3).should_crash(&point));
        assert!(!NoFaults.should_crash(&point));
    }
}
