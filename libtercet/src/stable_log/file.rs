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

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::InternalError;
use crate::process::Process;

use super::{StableLog, StableLogEntry, StableLogFactory};

/// Creates one `<name>.log` file per process inside a directory.
#[derive(Clone, Debug)]
pub struct FileStableLogFactory {
    directory: PathBuf,
}

impl FileStableLogFactory {
    pub fn new<D: Into<PathBuf>>(directory: D) -> Self {
        FileStableLogFactory {
            directory: directory.into(),
        }
    }

    /// The path of the log file for the given name.
    pub fn path(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{}.log", name))
    }
}

impl<P> StableLogFactory<P, SystemTime> for FileStableLogFactory
where
    P: Process,
{
    type Log = FileStableLog;

    fn create_log(&self, name: &str) -> Result<FileStableLog, InternalError> {
        FileStableLog::open(self.path(name))
    }
}

/// A log file with one `<unix-millis> <process> <STATE>` line per entry.
///
/// Every append is synced to disk before it returns.
#[derive(Debug)]
pub struct FileStableLog {
    file: File,
    path: PathBuf,
}

impl FileStableLog {
    /// Open a log file for appending, creating it if it does not exist.
    pub fn open<F: Into<PathBuf>>(path: F) -> Result<Self, InternalError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| InternalError::from_source(Box::new(e)))?;

        Ok(FileStableLog { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<P> StableLog<P, SystemTime> for FileStableLog
where
    P: Process,
{
    fn append(&mut self, entry: StableLogEntry<P, SystemTime>) -> Result<(), InternalError> {
        writeln!(self.file, "{}", entry)
            .and_then(|_| self.file.flush())
            .and_then(|_| self.file.sync_data())
            .map_err(|e| InternalError::from_source(Box::new(e)))
    }
}
