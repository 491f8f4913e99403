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

//! Pure commit-protocol state machines.
//!
//! An [`Algorithm`] never performs I/O. Given an event and the current context it returns the
//! list of actions the caller must apply, in order: persisting context updates, sending
//! messages, and reacting to notifications.

use crate::error::AlgorithmError;

#[cfg(feature = "algorithm-three-phase-commit")]
pub mod three_phase_commit;

pub trait Action {}
pub trait Value: Clone {}

impl Value for () {}
impl Value for String {}
impl Value for Vec<u8> {}

pub trait Algorithm {
    type Event;
    type Action;
    type Context;

    fn event(
        &self,
        event: Self::Event,
        context: Self::Context,
    ) -> Result<Vec<Self::Action>, AlgorithmError>;
}
