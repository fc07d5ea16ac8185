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

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio::time::error::Elapsed;

/// A single point in time bounding every call made during one validation run.
///
/// The deadline is created once, when the run starts, and passed by reference
/// to each operation that talks to the network. Calls that are still in flight
/// when the deadline elapses are abandoned and fail with [Elapsed].
///
/// # Example
/// ```
/// # use workload_identity_auth::deadline::Deadline;
/// # use std::time::Duration;
/// # tokio_test::block_on(async {
/// let deadline = Deadline::after(Duration::from_secs(150));
/// let answer = deadline.bound(async { 42 }).await;
/// assert_eq!(answer.ok(), Some(42));
/// # });
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Creates a deadline `timeout` from now.
    ///
    /// Timeouts too large to represent are clamped to roughly thirty years.
    pub fn after(timeout: Duration) -> Self {
        let now = Instant::now();
        let at = now
            .checked_add(timeout)
            .unwrap_or_else(|| now + Duration::from_secs(86400 * 365 * 30));
        Self { at }
    }

    /// The time left before the deadline elapses, zero if it already has.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// Returns `true` if the deadline already elapsed.
    pub fn is_elapsed(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Runs `future` to completion, unless the deadline elapses first.
    pub async fn bound<F>(&self, future: F) -> Result<F::Output, Elapsed>
    where
        F: Future,
    {
        tokio::time::timeout_at(self.at, future).await
    }
}
