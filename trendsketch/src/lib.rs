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

//! Bounded-memory detection of trending words over a stream of short documents.
//!
//! Every document is normalized into tokens and summarized by a per-document
//! snapshot: a [`countmin::CountMinSketch`] for frequency estimates paired with a
//! [`candidates::CandidateSet`] that remembers which words are worth querying. The
//! last N snapshots live in a [`window::SlidingWindow`], and
//! [`trending::compute_top_k`] ranks the union of their candidates by summed
//! sketch estimates.
//!
//! The crate exposes:
//! - [`normalize::Normalizer`] for lowercasing, tokenizing and stopword removal.
//! - [`countmin::CountMinSketch`] for fixed-memory, one-sided frequency estimates.
//! - [`candidates::CandidateSet`] for bounded heavy-hitter candidates.
//! - [`window::SlidingWindow`] for FIFO retention of document snapshots.
//! - [`trending::TrendingAggregator`] for ranked, normalized top-K results.
//! - [`pipeline::Pipeline`] for driving a [`source::DocumentSource`] into a
//!   [`sink::TrendSink`].

#![deny(missing_docs)]

pub mod candidates;
pub mod config;
pub mod countmin;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod sink;
pub mod snapshot;
pub mod source;
pub mod trending;
pub mod window;
