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

use crate::algorithm::{Action, Value};
use crate::process::Process;
use crate::time::Time;

use super::CoordinatorContext;
use super::DecisionReason;
use super::ThreePhaseCommitContext;
use super::ThreePhaseCommitMessage;

#[derive(Debug, PartialEq)]
pub enum CoordinatorAction<P, V, T>
where
    P: Process,
    V: Value,
    T: Time,
{
    Update {
        context: ThreePhaseCommitContext<P, T, CoordinatorContext<P>>,
        alarm: Option<T>,
    },
    SendMessage(P, ThreePhaseCommitMessage<V>),
    Notify(CoordinatorActionNotification<P>),
}

impl<P, V, T> Action for CoordinatorAction<P, V, T>
where
    P: Process,
    V: Value,
    T: Time,
{
}

#[derive(Debug, PartialEq)]
pub enum CoordinatorActionNotification<P>
where
    P: Process,
{
    Commit(DecisionReason<P>),
    Abort(DecisionReason<P>),
    MessageDropped(String),
}
