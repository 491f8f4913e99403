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

use crate::algorithm::Value;
use crate::process::Process;

use super::ParticipantMessage;
use super::Vote;

pub enum ParticipantEvent<P, V>
where
    P: Process,
    V: Value,
{
    /// The bounded wait set by the last context update has expired.
    Alarm(),
    Deliver(P, ParticipantMessage<V>),
    /// Enter INIT and start waiting for the coordinator's `VoteRequest`.
    Start(),
    /// The local work's answer to a `RequestForVote` notification.
    Vote(Vote),
}
