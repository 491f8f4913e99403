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

//! Durable records of state transitions.
//!
//! Each coordinator and participant writes every state it enters to its own log before it sends
//! any message which depends on that state. The engine only ever appends; the log exists so that
//! an operator (or a future recovery path) can tell what each process decided.

mod entry;
mod file;
mod memory;

use crate::error::InternalError;
use crate::process::Process;
use crate::time::Time;

pub use entry::StableLogEntry;
pub use file::{FileStableLog, FileStableLogFactory};
pub use memory::{MemoryStableLog, MemoryStableLogFactory};

/// An append-only log owned by a single process.
pub trait StableLog<P, T>
where
    P: Process,
    T: Time,
{
    /// Durably append an entry.
    ///
    /// # Errors
    ///
    /// An [`InternalError`] is returned if the entry could not be made durable. Callers treat
    /// this as fatal.
    fn append(&mut self, entry: StableLogEntry<P, T>) -> Result<(), InternalError>;
}

/// Creates the log for a process, by name.
pub trait StableLogFactory<P, T>
where
    P: Process,
    T: Time,
{
    type Log: StableLog<P, T>;

    fn create_log(&self, name: &str) -> Result<Self::Log, InternalError>;
}
