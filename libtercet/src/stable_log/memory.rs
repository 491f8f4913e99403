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

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::algorithm::three_phase_commit::ThreePhaseCommitState;
use crate::error::InternalError;
use crate::process::Process;
use crate::time::Time;

use super::{StableLog, StableLogEntry, StableLogFactory};

type Logs<P, T> = Arc<Mutex<BTreeMap<String, Vec<StableLogEntry<P, T>>>>>;

/// Keeps every log in memory, where it can be inspected after the processes finish.
///
/// Clones share the same logs.
pub struct MemoryStableLogFactory<P, T>
where
    P: Process,
    T: Time,
{
    logs: Logs<P, T>,
}

impl<P, T> MemoryStableLogFactory<P, T>
where
    P: Process,
    T: Time,
{
    pub fn new() -> Self {
        MemoryStableLogFactory {
            logs: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// The entries appended to the named log so far.
    pub fn entries(&self, name: &str) -> Vec<StableLogEntry<P, T>> {
        self.logs.lock().get(name).cloned().unwrap_or_default()
    }

    /// The states recorded in the named log, in order.
    pub fn states(&self, name: &str) -> Vec<ThreePhaseCommitState> {
        self.logs
            .lock()
            .get(name)
            .map(|entries| entries.iter().map(StableLogEntry::state).collect())
            .unwrap_or_default()
    }
}

impl<P, T> Default for MemoryStableLogFactory<P, T>
where
    P: Process,
    T: Time,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, T> Clone for MemoryStableLogFactory<P, T>
where
    P: Process,
    T: Time,
{
    fn clone(&self) -> Self {
        MemoryStableLogFactory {
            logs: Arc::clone(&self.logs),
        }
    }
}

impl<P, T> StableLogFactory<P, T> for MemoryStableLogFactory<P, T>
where
    P: Process,
    T: Time,
{
    type Log = MemoryStableLog<P, T>;

    fn create_log(&self, name: &str) -> Result<Self::Log, InternalError> {
        let mut logs = self.logs.lock();
        if logs.contains_key(name) {
            return Err(InternalError::with_message(format!(
                "log {} already exists",
                name
            )));
        }
        logs.insert(name.to_string(), Vec::new());

        Ok(MemoryStableLog {
            name: name.to_string(),
            logs: Arc::clone(&self.logs),
        })
    }
}

pub struct MemoryStableLog<P, T>
where
    P: Process,
    T: Time,
{
    name: String,
    logs: Logs<P, T>,
}

impl<P, T> StableLog<P, T> for MemoryStableLog<P, T>
where
    P: Process,
    T: Time,
{
    fn append(&mut self, entry: StableLogEntry<P, T>) -> Result<(), InternalError> {
        self.logs
            .lock()
            .get_mut(&self.name)
            .ok_or_else(|| InternalError::with_message(format!("log {} is missing", self.name)))?
            .push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;

    #[test]
    fn appended_states_are_visible_through_clones() {
        let factory = MemoryStableLogFactory::<u64, SystemTime>::new();
        let mut log = factory.clone().create_log("coordinator-0").unwrap();

        log.append(StableLogEntry::new(
            0,
            ThreePhaseCommitState::Init,
            SystemTime::now(),
        ))
        .unwrap();
        log.append(StableLogEntry::new(
            0,
            ThreePhaseCommitState::Wait,
            SystemTime::now(),
        ))
        .unwrap();

        assert_eq!(
            factory.states("coordinator-0"),
            vec![ThreePhaseCommitState::Init, ThreePhaseCommitState::Wait]
        );
        assert_eq!(factory.entries("coordinator-0")[0].process(), &0);
        assert!(factory.states("participant-1").is_empty());
    }

    #[test]
    fn log_names_are_unique() {
        let factory = MemoryStableLogFactory::<u64, SystemTime>::new();
        let _log = factory.create_log("participant-1").unwrap();

        assert!(factory.create_log("participant-1").is_err());
    }
}
