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

//! Contains ElectionFailedError

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FormatResult};

/// No decision arrived from the elected successor coordinator in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectionFailedError {
    process: String,
    successor: String,
}

impl ElectionFailedError {
    pub fn new(process: String, successor: String) -> Self {
        Self { process, successor }
    }

    /// The participant which gave up waiting.
    pub fn process(&self) -> &str {
        &self.process
    }

    /// The successor the participant was waiting on.
    pub fn successor(&self) -> &str {
        &self.successor
    }
}

impl Error for ElectionFailedError {}

impl Display for ElectionFailedError {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        write!(
            f,
            "participant {} received no decision from successor coordinator {}",
            self.process, self.successor
        )
    }
}
