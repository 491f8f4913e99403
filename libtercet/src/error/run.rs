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

//! Contains RunError

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FormatResult};

use super::AlgorithmError;
use super::ElectionFailedError;
use super::InternalError;
use super::InvalidStateError;
use super::ProtocolViolationError;

/// An error which terminates a coordinator or participant before it reaches a decision.
#[derive(Debug)]
pub enum RunError {
    /// The algorithm rejected an event.
    Algorithm(AlgorithmError),

    /// The elected successor coordinator never announced a decision.
    ElectionFailed(ElectionFailedError),

    /// A collaborator (channel or stable log) failed.
    Internal(InternalError),

    /// The driver was used out of order, for example `run` before `init`.
    InvalidState(InvalidStateError),
}

impl RunError {
    /// Returns the protocol violation which caused this error, if any.
    pub fn protocol_violation(&self) -> Option<&ProtocolViolationError> {
        match self {
            RunError::Algorithm(AlgorithmError::ProtocolViolation(e)) => Some(e),
            _ => None,
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RunError::Algorithm(e) => Some(e),
            RunError::ElectionFailed(e) => Some(e),
            RunError::Internal(e) => Some(e),
            RunError::InvalidState(e) => Some(e),
        }
    }
}

impl Display for RunError {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        match self {
            RunError::Algorithm(e) => write!(f, "{}", e),
            RunError::ElectionFailed(e) => write!(f, "{}", e),
            RunError::Internal(e) => write!(f, "{}", e),
            RunError::InvalidState(e) => write!(f, "{}", e),
        }
    }
}

impl From<AlgorithmError> for RunError {
    fn from(err: AlgorithmError) -> Self {
        RunError::Algorithm(err)
    }
}

impl From<ElectionFailedError> for RunError {
    fn from(err: ElectionFailedError) -> Self {
        RunError::ElectionFailed(err)
    }
}

impl From<InternalError> for RunError {
    fn from(err: InternalError) -> Self {
        RunError::Internal(err)
    }
}

impl From<InvalidStateError> for RunError {
    fn from(err: InvalidStateError) -> Self {
        RunError::InvalidState(err)
    }
}

impl From<ProtocolViolationError> for RunError {
    fn from(err: ProtocolViolationError) -> Self {
        RunError::Algorithm(AlgorithmError::ProtocolViolation(err))
    }
}
