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

//! The individual identity checks.
//!
//! Each check acquires its own token and reports its own failures. None of
//! them retry.

mod cluster_wide;
mod pod;
mod system;

pub use cluster_wide::ResourceListingValidator;
pub use pod::SecretRetrievalValidator;
pub use system::SystemIdentityValidator;

use std::fmt::{Display, Formatter};

/// Identifies a check in reports and errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// A user-assigned identity bound to the pod reads a Key Vault secret.
    PodScoped,
    /// A user-assigned identity bound to the cluster lists virtual machines.
    ClusterWide,
    /// The system-assigned identity obtains a Resource Manager token.
    SystemAssigned,
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PodScoped => write!(f, "pod-scoped identity check"),
            Self::ClusterWide => write!(f, "cluster-wide identity check"),
            Self::SystemAssigned => write!(f, "system-assigned identity check"),
        }
    }
}
