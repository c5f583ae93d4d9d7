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

use tokio_util::sync::CancellationToken;

/// The receiving end of the shutdown signal, cloned into every worker.
#[derive(Debug, Clone)]
#[repr(transparent)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    /// `true` once the signal fired.
    pub fn is_shutdown(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the signal fired.
    pub async fn wait(&self) {
        self.token.cancelled().await
    }
}

/// The sending end, kept by the application.
#[derive(Debug)]
#[repr(transparent)]
pub struct ShutdownSignal {
    token: CancellationToken,
}

impl ShutdownSignal {
    pub fn cancel(&self) {
        self.token.cancel()
    }
}

/// Creates the linked sender/receiver pair.
pub fn shutdown() -> (ShutdownSignal, Shutdown) {
    let token = CancellationToken::new();
    (
        ShutdownSignal {
            token: token.clone(),
        },
        Shutdown { token },
    )
}
