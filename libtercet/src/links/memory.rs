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

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::InternalError;
use crate::message::Message;

use super::Channel;

struct NetworkState<M> {
    next_process: u64,
    groups: BTreeMap<String, Vec<u64>>,
    mailboxes: BTreeMap<u64, VecDeque<(u64, M)>>,
}

struct Shared<M> {
    state: Mutex<NetworkState<M>>,
    delivered: Condvar,
}

/// An in-process network.
///
/// Every channel created from the same network can reach every other one. Processes are
/// identified by `u64` values assigned in join order, starting at 0.
pub struct MemoryNetwork<M> {
    shared: Arc<Shared<M>>,
}

impl<M: Message> MemoryNetwork<M> {
    pub fn new() -> Self {
        MemoryNetwork {
            shared: Arc::new(Shared {
                state: Mutex::new(NetworkState {
                    next_process: 0,
                    groups: BTreeMap::new(),
                    mailboxes: BTreeMap::new(),
                }),
                delivered: Condvar::new(),
            }),
        }
    }

    /// Create an unjoined channel into this network.
    pub fn channel(&self) -> MemoryChannel<M> {
        MemoryChannel {
            shared: Arc::clone(&self.shared),
            process: None,
            bound: false,
        }
    }

    /// The number of messages waiting to be received by `process`.
    pub fn pending(&self, process: u64) -> usize {
        self.shared
            .state
            .lock()
            .mailboxes
            .get(&process)
            .map(VecDeque::len)
            .unwrap_or(0)
    }
}

impl<M: Message> Default for MemoryNetwork<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for MemoryNetwork<M> {
    fn clone(&self) -> Self {
        MemoryNetwork {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// One process's endpoint into a [`MemoryNetwork`].
pub struct MemoryChannel<M> {
    shared: Arc<Shared<M>>,
    process: Option<u64>,
    bound: bool,
}

impl<M: Message> MemoryChannel<M> {
    fn bound_process(&self) -> Result<u64, InternalError> {
        match self.process {
            Some(process) if self.bound => Ok(process),
            _ => Err(InternalError::with_message(
                "channel must be joined and bound before use",
            )),
        }
    }

    fn receive_matching<F>(
        &self,
        timeout: Duration,
        accept: F,
    ) -> Result<Option<(u64, M)>, InternalError>
    where
        F: Fn(&u64) -> bool,
    {
        let process = self.bound_process()?;
        let deadline = Instant::now() + timeout;

        let mut state = self.shared.state.lock();
        loop {
            let mailbox = state.mailboxes.get_mut(&process).ok_or_else(|| {
                InternalError::with_message(format!("no mailbox for process {}", process))
            })?;

            // Taking the first match keeps messages from each sender in order.
            if let Some(index) = mailbox.iter().position(|(sender, _)| accept(sender)) {
                return Ok(mailbox.remove(index));
            }

            if self
                .shared
                .delivered
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                return Ok(None);
            }
        }
    }
}

impl<M: Message> Channel<u64, M> for MemoryChannel<M> {
    fn join(&mut self, group: &str) -> Result<u64, InternalError> {
        if let Some(process) = self.process {
            return Err(InternalError::with_message(format!(
                "process {} has already joined a group",
                process
            )));
        }

        let mut state = self.shared.state.lock();
        let process = state.next_process;
        state.next_process += 1;
        state
            .groups
            .entry(group.to_string())
            .or_default()
            .push(process);
        state.mailboxes.insert(process, VecDeque::new());

        self.process = Some(process);
        Ok(process)
    }

    fn bind(&mut self, process: &u64) -> Result<(), InternalError> {
        match self.process {
            Some(joined) if joined == *process => {
                self.bound = true;
                Ok(())
            }
            Some(joined) => Err(InternalError::with_message(format!(
                "cannot bind process {}; channel joined as {}",
                process, joined
            ))),
            None => Err(InternalError::with_message(format!(
                "cannot bind process {} before joining a group",
                process
            ))),
        }
    }

    fn subgroup(&self, group: &str) -> Result<Vec<u64>, InternalError> {
        Ok(self
            .shared
            .state
            .lock()
            .groups
            .get(group)
            .cloned()
            .unwrap_or_default())
    }

    fn send_to(&self, targets: &[u64], message: M) -> Result<(), InternalError> {
        let sender = self.bound_process()?;

        let mut state = self.shared.state.lock();
        for target in targets {
            state
                .mailboxes
                .get_mut(target)
                .ok_or_else(|| {
                    InternalError::with_message(format!("unknown target process {}", target))
                })?
                .push_back((sender, message.clone()));
        }
        drop(state);

        self.shared.delivered.notify_all();
        Ok(())
    }

    fn receive_from(
        &self,
        sources: &[u64],
        timeout: Duration,
    ) -> Result<Option<(u64, M)>, InternalError> {
        self.receive_matching(timeout, |sender| sources.contains(sender))
    }

    fn receive_from_any(&self, timeout: Duration) -> Result<Option<(u64, M)>, InternalError> {
        self.receive_matching(timeout, |_| true)
    }
}
