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

mod errors;

pub use errors::QueueError;

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::{channel, Receiver, Sender};
use tokio::sync::Mutex;

/// The bounded fifo of admitted urls awaiting a worker.
///
/// Producers never block: `enqueue` on a full queue reports
/// [`QueueError::Full`] and the entry is lost. Consumers block in
/// `dequeue` until an url arrives. Delivery is fifo per producer, the
/// interleave across producers is whatever the channel makes of it.
#[derive(Debug)]
pub struct ReadyQueue {
    sender: Sender<String>,
    receiver: Mutex<Receiver<String>>,
    depth: AtomicUsize,
    capacity: usize,
}

impl ReadyQueue {
    pub fn new(capacity: NonZeroUsize) -> Self {
        let (sender, receiver) = channel(capacity.get());
        Self {
            sender,
            receiver: Mutex::new(receiver),
            depth: AtomicUsize::new(0),
            capacity: capacity.get(),
        }
    }

    /// Offers an url without blocking.
    pub fn enqueue(&self, url: String) -> Result<(), QueueError> {
        match self.sender.try_send(url) {
            Ok(()) => {
                self.depth.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(QueueError::Full {
                capacity: self.capacity,
            }),
            Err(TrySendError::Closed(_)) => Err(QueueError::Closed),
        }
    }

    /// Takes the next url, waiting until one is available. Exactly one
    /// caller receives each url. `None` means the queue is closed.
    pub async fn dequeue(&self) -> Option<String> {
        let url = self.receiver.lock().await.recv().await;
        if url.is_some() {
            self.depth.fetch_sub(1, Ordering::Relaxed);
        }
        url
    }

    /// Number of urls currently queued.
    pub fn len(&self) -> usize {
        self.depth.load(Ordering::Relaxed)
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
