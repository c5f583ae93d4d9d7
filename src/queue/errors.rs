// Copyright 2024. Felix Engl
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

use thiserror::Error;

/// Errors produced by the ready queue.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue is at capacity, the offered url was dropped.
    #[error("the ready queue is full ({capacity} entries)")]
    Full { capacity: usize },
    /// The consuming side is gone.
    #[error("the ready queue is closed")]
    Closed,
}
