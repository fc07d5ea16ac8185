// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Validates that a workload identity broker issues usable tokens.
//!
//! The validator runs once. Depending on its configuration it verifies either
//! a user-assigned identity bound to the current pod (by reading a Key Vault
//! secret) or a user-assigned identity bound to the whole cluster (by listing
//! the virtual machines in a resource group). In both cases it then verifies
//! the system-assigned identity. The first failure stops the run.

pub mod args;
pub mod checks;
pub mod compute;
pub mod config;
pub mod error;
pub mod keyvault;
pub mod orchestrator;
pub mod rest;

pub use error::Error;

/// The long description shown by `--help`.
pub const DESCRIPTION: &str = concat!(
    "This program verifies that the workload identity broker issues tokens",
    " that Azure services accept. It exits with status 0 when every check",
    " passes and with status 1 on the first failure."
);

/// A `Result` alias where the `Err` case is [Error].
pub type Result<T> = std::result::Result<T, Error>;
