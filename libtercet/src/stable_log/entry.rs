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

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::algorithm::three_phase_commit::ThreePhaseCommitState;
use crate::error::InternalError;
use crate::process::Process;
use crate::time::Time;

/// A single state transition of a process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StableLogEntry<P, T>
where
    P: Process,
    T: Time,
{
    process: P,
    state: ThreePhaseCommitState,
    timestamp: T,
}

impl<P, T> StableLogEntry<P, T>
where
    P: Process,
    T: Time,
{
    pub fn new(process: P, state: ThreePhaseCommitState, timestamp: T) -> Self {
        StableLogEntry {
            process,
            state,
            timestamp,
        }
    }

    pub fn process(&self) -> &P {
        &self.process
    }

    pub fn state(&self) -> ThreePhaseCommitState {
        self.state
    }

    pub fn timestamp(&self) -> &T {
        &self.timestamp
    }
}

impl<P> StableLogEntry<P, SystemTime>
where
    P: Process + FromStr,
{
    /// Parse a line written by a [`FileStableLog`](super::FileStableLog), with or without its
    /// trailing newline.
    ///
    /// # Errors
    ///
    /// An [`InternalError`] is returned if the line is not `<unix-millis> <process> <STATE>`.
    pub fn parse_line(line: &str) -> Result<Self, InternalError> {
        let malformed = || InternalError::with_message(format!("malformed log line: {:?}", line));

        // The process is everything between the first and the last space; it may contain spaces.
        let (millis, rest) = line.trim_end().split_once(' ').ok_or_else(malformed)?;
        let (process, state) = rest.rsplit_once(' ').ok_or_else(malformed)?;

        let millis = millis.parse::<u64>().map_err(|_| malformed())?;
        let process = process.parse::<P>().map_err(|_| malformed())?;
        let state = state
            .parse::<ThreePhaseCommitState>()
            .map_err(|e| InternalError::from_source(Box::new(e)))?;

        Ok(StableLogEntry {
            process,
            state,
            timestamp: UNIX_EPOCH + Duration::from_millis(millis),
        })
    }
}

impl<P> Display for StableLogEntry<P, SystemTime>
where
    P: Process,
{
    /// Formats the entry as written to a file log, without the trailing newline.
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        let millis = self.timestamp.duration_since_or_zero(UNIX_EPOCH).as_millis();
        write!(f, "{} {} {}", millis, self.process, self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_format() {
        let entry = StableLogEntry::new(
            3u64,
            ThreePhaseCommitState::PreCommit,
            UNIX_EPOCH + Duration::from_millis(1_650_000_000_123),
        );

        assert_eq!(entry.to_string(), "1650000000123 3 PRECOMMIT");
        assert_eq!(
            StableLogEntry::<u64, SystemTime>::parse_line("1650000000123 3 PRECOMMIT\n").unwrap(),
            entry
        );
    }

    #[test]
    fn process_names_may_contain_spaces() {
        let entry = StableLogEntry::new(
            "node a".to_string(),
            ThreePhaseCommitState::Ready,
            UNIX_EPOCH + Duration::from_millis(42),
        );

        assert_eq!(entry.to_string(), "42 node a READY");
        assert_eq!(
            StableLogEntry::<String, SystemTime>::parse_line("42 node a READY\n").unwrap(),
            entry
        );
    }

    #[test]
    fn malformed_lines_are_rejected() {
        for line in [
            "",
            "1650000000123 3",
            "1650000000123 3 PRECOMMIT extra",
            "yesterday 3 PRECOMMIT",
            "1650000000123 three PRECOMMIT",
            "1650000000123 3 PREPARED",
        ] {
            assert!(
                StableLogEntry::<u64, SystemTime>::parse_line(line).is_err(),
                "accepted {:?}",
                line
            );
        }
    }
}
