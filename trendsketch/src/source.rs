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

//! Document sources consumed by the pipeline.
//!
//! A source is pulled once per tick. `Ok(None)` means "no data this tick" and is
//! never treated as a failure; `Err` carries [`ErrorKind::SourceUnavailable`] and
//! is logged and skipped by the pipeline.
//!
//! [`ErrorKind::SourceUnavailable`]: crate::error::ErrorKind::SourceUnavailable

use std::collections::VecDeque;
use std::io::BufRead;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;

/// A short text document such as a news item.
///
/// Deserializes from `{"title": ..., "text": ...}`; missing fields are empty and
/// unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    title: String,
    text: String,
}

impl Document {
    /// Creates a document from its title and body.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    /// Returns the title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the body text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns title and body joined by a space, the text that gets normalized.
    pub fn content(&self) -> String {
        format!("{} {}", self.title, self.text)
    }
}

/// Pull interface over an external document feed.
pub trait DocumentSource {
    /// Returns the next document, `Ok(None)` if none is available this tick.
    ///
    /// May block. The pipeline stops waiting for a blocked pull one poll interval
    /// after a stop request.
    fn next_document(&mut self) -> Result<Option<Document>, Error>;

    /// Returns true once the source will never produce another document.
    ///
    /// Live feeds never exhaust; finite feeds let the pipeline drain and stop.
    fn is_exhausted(&self) -> bool {
        false
    }
}

impl<S: DocumentSource + ?Sized> DocumentSource for Box<S> {
    fn next_document(&mut self) -> Result<Option<Document>, Error> {
        (**self).next_document()
    }

    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }
}

/// Reads one JSON document per line.
///
/// Blank lines yield no document for that tick. A line that is not a valid
/// document is reported as unavailable data, and reading resumes on the next line.
#[derive(Debug)]
pub struct JsonLinesSource<R> {
    reader: R,
    line_number: u64,
    exhausted: bool,
}

impl<R: BufRead> JsonLinesSource<R> {
    /// Creates a source over `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            exhausted: false,
        }
    }
}

impl<R: BufRead> DocumentSource for JsonLinesSource<R> {
    fn next_document(&mut self) -> Result<Option<Document>, Error> {
        if self.exhausted {
            return Ok(None);
        }

        let mut line = String::new();
        let read = self.reader.read_line(&mut line);
        if !matches!(read, Ok(0)) {
            // A line that fails UTF-8 decoding is still consumed.
            self.line_number += 1;
        }
        let read = read.map_err(|err| {
            Error::source_unavailable("failed to read document")
                .with_context("line", self.line_number)
                .set_source(err)
        })?;
        if read == 0 {
            self.exhausted = true;
            return Ok(None);
        }

        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(line).map(Some).map_err(|err| {
            Error::source_unavailable("malformed document record")
                .with_context("line", self.line_number)
                .set_source(err)
        })
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

/// In-memory queue of documents, drained front to back.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: VecDeque<Document>,
}

impl MemorySource {
    /// Creates a source that yields `documents` in order.
    pub fn new(documents: impl IntoIterator<Item = Document>) -> Self {
        Self {
            documents: documents.into_iter().collect(),
        }
    }

    /// Appends a document.
    pub fn push(&mut self, document: Document) {
        self.documents.push_back(document);
    }

    /// Returns the number of documents not yet pulled.
    pub fn remaining(&self) -> usize {
        self.documents.len()
    }
}

impl DocumentSource for MemorySource {
    fn next_document(&mut self) -> Result<Option<Document>, Error> {
        Ok(self.documents.pop_front())
    }

    fn is_exhausted(&self) -> bool {
        self.documents.is_empty()
    }
}
