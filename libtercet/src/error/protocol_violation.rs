// Copyright 2022 Cargill Incorporated
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

//! Contains ProtocolViolationError

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FormatResult};

/// A message arrived that the protocol does not allow in the receiver's current state.
///
/// A protocol violation is fatal for the transaction attempt of the receiving process; the
/// process stops without guessing what the sender meant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolViolationError {
    expected: String,
    received: String,
}

impl ProtocolViolationError {
    pub fn new(expected: String, received: String) -> Self {
        Self { expected, received }
    }

    /// A description of the message(s) which would have been valid.
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// A description of the message which actually arrived.
    pub fn received(&self) -> &str {
        &self.received
    }
}

impl Error for ProtocolViolationError {}

impl Display for ProtocolViolationError {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        write!(
            f,
            "protocol violation: expected {}, received {}",
            self.expected, self.received
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_both_messages() {
        let err = ProtocolViolationError::new(
            "PrepareCommit or GlobalAbort".into(),
            "VoteRequest".into(),
        );

        assert_eq!(err.expected(), "PrepareCommit or GlobalAbort");
        assert_eq!(err.received(), "VoteRequest");
        assert_eq!(
            err.to_string(),
            "protocol violation: expected PrepareCommit or GlobalAbort, received VoteRequest"
        );
    }
}
