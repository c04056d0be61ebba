// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Fixed-capacity FIFO window over the most recent document snapshots.

use std::collections::VecDeque;
use std::collections::vec_deque;

use crate::snapshot::DocumentSnapshot;

/// The last `capacity` document snapshots, in arrival order.
///
/// Pushing onto a full window discards the oldest snapshot.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    capacity: usize,
    snapshots: VecDeque<DocumentSnapshot>,
}

impl SlidingWindow {
    /// Creates an empty window holding at most `capacity` snapshots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "window capacity must be positive");
        Self {
            capacity,
            snapshots: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Returns the maximum number of snapshots held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of snapshots held.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns true if the window holds no snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Returns true if the next push will evict.
    pub fn is_full(&self) -> bool {
        self.snapshots.len() == self.capacity
    }

    /// Appends `snapshot` and discards the oldest one if the window overflows.
    ///
    /// Returns true if a snapshot was evicted.
    pub fn push(&mut self, snapshot: DocumentSnapshot) -> bool {
        self.snapshots.push_back(snapshot);
        if self.snapshots.len() > self.capacity {
            if let Some(evicted) = self.snapshots.pop_front() {
                tracing::debug!(seq = evicted.seq(), "evicted snapshot from window");
            }
            return true;
        }
        false
    }

    /// Returns the held snapshots, oldest first.
    ///
    /// The iterator is cloneable, so it can be restarted from any position.
    pub fn snapshots(&self) -> vec_deque::Iter<'_, DocumentSnapshot> {
        self.snapshots.iter()
    }
}

impl<'a> IntoIterator for &'a SlidingWindow {
    type Item = &'a DocumentSnapshot;
    type IntoIter = vec_deque::Iter<'a, DocumentSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots()
    }
}
