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

//! Defines the group communication abstraction.
//!
//! Processes are organized into named groups (the coordinator joins `"coordinator"`, participants
//! join `"participant"`). Messages are exchanged between processes over links[^note-1]; the only
//! ordering promise is that messages from one sender to one receiver are delivered in the order
//! they were sent.
//!
//! A [`MemoryNetwork`] connects processes living in the same OS process, which is sufficient for
//! tests and simulations.
//!
//! [^note-1]: For a full explanation of links, see Cachin, Guerraoui, and Rodrigues, **Reliable and
//! Secure Distributed Programming**, 2nd ed., 2.4.

mod memory;

use std::time::Duration;

use crate::error::InternalError;
use crate::message::Message;
use crate::process::Process;

pub use memory::{MemoryChannel, MemoryNetwork};

/// A process's endpoint into the group communication layer.
pub trait Channel<P, M>
where
    P: Process,
    M: Message,
{
    /// Join a group, returning the identity assigned to this process.
    ///
    /// # Errors
    ///
    /// An [`InternalError`] is returned if the channel has already joined a group or the
    /// underlying implementation fails.
    fn join(&mut self, group: &str) -> Result<P, InternalError>;

    /// Bind the channel to the identity returned by [`Channel::join`]. Messages can only be sent
    /// and received once bound.
    fn bind(&mut self, process: &P) -> Result<(), InternalError>;

    /// The members of a group at the time of the call.
    fn subgroup(&self, group: &str) -> Result<Vec<P>, InternalError>;

    /// Send a message to each of the given processes.
    fn send_to(&self, targets: &[P], message: M) -> Result<(), InternalError>;

    /// Wait up to `timeout` for a message from one of `sources`.
    ///
    /// Messages from other processes stay queued for a later receive. `Ok(None)` is returned if
    /// nothing arrives in time.
    fn receive_from(
        &self,
        sources: &[P],
        timeout: Duration,
    ) -> Result<Option<(P, M)>, InternalError>;

    /// Wait up to `timeout` for a message from any process.
    fn receive_from_any(&self, timeout: Duration) -> Result<Option<(P, M)>, InternalError>;
}
