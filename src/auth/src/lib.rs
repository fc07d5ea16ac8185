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

//! Managed identity token acquisition.
//!
//! Workloads running on Azure virtual machines, or in pods fronted by a
//! pod-identity proxy, obtain access tokens from a local credential broker:
//! the [Instance Metadata Service] managed identity endpoint. This crate
//! locates that endpoint, asks it for tokens on behalf of the system-assigned
//! identity or of a specific user-assigned identity, and wraps the resulting
//! tokens so they can authorize calls to Azure APIs.
//!
//! The crate is intentionally small. It targets a single broker protocol, it
//! does not cache tokens across processes, and every request is bounded by a
//! caller-provided [Deadline](deadline::Deadline).
//!
//! [Instance Metadata Service]: https://learn.microsoft.com/azure/active-directory/managed-identities-azure-resources/how-to-use-vm-token

pub mod errors;

/// Discovery of the credential broker endpoint.
pub mod endpoint;

/// How the broker is asked to pick among several identities.
pub mod selector;

/// Types and functions to work with access tokens.
pub mod token;

/// Shared cancellation for all the calls made in one run.
pub mod deadline;

/// Token refresh and request authorization.
pub mod credentials;

pub(crate) mod msi;

pub use msi::client::TokenAcquirer;
pub use msi::{KEY_VAULT_AUDIENCE, RESOURCE_MANAGER_AUDIENCE};

/// A `Result` alias where the `Err` case is
/// `workload_identity_auth::errors::CredentialsError`.
pub type Result<T> = std::result::Result<T, crate::errors::CredentialsError>;
