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

//! The application's part of a transaction: deciding how to vote.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::algorithm::three_phase_commit::Vote;

/// The commit probability of [`RandomWork::default`].
pub const DEFAULT_COMMIT_PROBABILITY: f64 = 2.0 / 3.0;

/// Performs a participant's local work for a transaction and decides its vote.
///
/// Closures of the form `FnMut(&V) -> Vote` are accepted wherever a `LocalWork` is.
pub trait LocalWork<V> {
    fn vote(&mut self, value: &V) -> Vote;
}

impl<V, F> LocalWork<V> for F
where
    F: FnMut(&V) -> Vote,
{
    fn vote(&mut self, value: &V) -> Vote {
        self(value)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysCommit;

impl<V> LocalWork<V> for AlwaysCommit {
    fn vote(&mut self, _value: &V) -> Vote {
        Vote::Commit
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysAbort;

impl<V> LocalWork<V> for AlwaysAbort {
    fn vote(&mut self, _value: &V) -> Vote {
        Vote::Abort
    }
}

/// Votes commit with a fixed probability.
pub struct RandomWork<R: Rng = StdRng> {
    commit_probability: f64,
    rng: R,
}

impl RandomWork<StdRng> {
    pub fn new(commit_probability: f64) -> Self {
        Self::with_rng(commit_probability, StdRng::from_entropy())
    }

    /// Use a seeded generator so the sequence of votes is reproducible.
    pub fn with_seed(commit_probability: f64, seed: u64) -> Self {
        Self::with_rng(commit_probability, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomWork<R> {
    pub fn with_rng(commit_probability: f64, rng: R) -> Self {
        RandomWork {
            commit_probability: clamp_probability(commit_probability),
            rng,
        }
    }

    pub fn commit_probability(&self) -> f64 {
        self.commit_probability
    }
}

impl Default for RandomWork<StdRng> {
    fn default() -> Self {
        Self::new(DEFAULT_COMMIT_PROBABILITY)
    }
}

impl<V, R: Rng> LocalWork<V> for RandomWork<R> {
    fn vote(&mut self, _value: &V) -> Vote {
        if self.rng.gen_bool(self.commit_probability) {
            Vote::Commit
        } else {
            Vote::Abort
        }
    }
}

pub(super) fn clamp_probability(probability: f64) -> f64 {
    if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_votes() {
        assert_eq!(LocalWork::<()>::vote(&mut AlwaysCommit, &()), Vote::Commit);
        assert_eq!(LocalWork::<()>::vote(&mut AlwaysAbort, &()), Vote::Abort);
    }

    #[test]
    fn closures_see_the_value() {
        let mut work = |value: &String| {
            if value.starts_with("ok") {
                Vote::Commit
            } else {
                Vote::Abort
            }
        };

        assert_eq!(work.vote(&"ok: debit".to_string()), Vote::Commit);
        assert_eq!(work.vote(&"overdrawn".to_string()), Vote::Abort);
    }

    #[test]
    fn random_work_respects_extreme_probabilities() {
        let mut always = RandomWork::with_seed(1.0, 7);
        let mut never = RandomWork::with_seed(0.0, 7);

        for _ in 0..100 {
            assert_eq!(LocalWork::<()>::vote(&mut always, &()), Vote::Commit);
            assert_eq!(LocalWork::<()>::vote(&mut never, &()), Vote::Abort);
        }
    }

    #[test]
    fn random_work_defaults() {
        assert_eq!(
            RandomWork::<StdRng>::default().commit_probability(),
            DEFAULT_COMMIT_PROBABILITY
        );
        assert_eq!(RandomWork::new(7.0).commit_probability(), 1.0);
        assert_eq!(RandomWork::new(f64::NAN).commit_probability(), 0.0);
    }
}
