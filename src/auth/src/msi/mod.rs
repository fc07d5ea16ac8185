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

pub(crate) mod client;

/// The audience for Azure Resource Manager tokens.
pub const RESOURCE_MANAGER_AUDIENCE: &str = "https://management.azure.com/";
/// The audience for Azure Key Vault data plane tokens.
pub const KEY_VAULT_AUDIENCE: &str = "https://vault.azure.net";

pub(crate) const MSI_ENDPOINT_ENV_VAR: &str = "MSI_ENDPOINT";
pub(crate) const MSI_DEFAULT_ENDPOINT: &str =
    "http://169.254.169.254/metadata/identity/oauth2/token";
pub(crate) const MSI_API_VERSION: &str = "2018-02-01";
pub(crate) const METADATA: &str = "metadata";
pub(crate) const METADATA_VALUE: &str = "true";
