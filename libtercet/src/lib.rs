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

//! Tercet is a non-blocking three-phase commit (3PC) engine.
//!
//! The crate is split into two layers:
//!
//! - the [`algorithm`] layer contains pure state machines which consume an event and a context
//!   and produce a list of actions;
//! - the [`runtime`] layer drives those state machines over a [`links::Channel`], records every
//!   state transition in a [`stable_log::StableLog`] and returns an [`runtime::Outcome`].

#[macro_use]
extern crate log;

#[cfg(feature = "algorithm")]
pub mod algorithm;
pub mod error;
#[cfg(feature = "links")]
pub mod links;
mod message;
mod process;
#[cfg(feature = "runtime")]
pub mod runtime;
#[cfg(feature = "stable-log")]
pub mod stable_log;
#[cfg(feature = "time")]
mod time;

#[cfg(feature = "algorithm")]
pub use algorithm::{Algorithm, Value};
pub use message::Message;
pub use process::Process;
#[cfg(feature = "time")]
pub use time::{SystemTimeFactory, Time, TimeSource};
