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

//! Command-line driver: reads JSON-lines documents, logs the trending words, and
//! optionally writes them to a JSON file after every document.

use std::fs;
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use trendsketch::config::DEFAULT_DELTA;
use trendsketch::config::DEFAULT_EPSILON;
use trendsketch::config::DEFAULT_HASH_SEED;
use trendsketch::config::DEFAULT_TOP_K;
use trendsketch::config::DEFAULT_WINDOW_SIZE;
use trendsketch::config::TrendConfig;
use trendsketch::error::Error;
use trendsketch::pipeline::Pipeline;
use trendsketch::pipeline::stop_channel;
use trendsketch::sink::JsonFileSink;
use trendsketch::sink::LogSink;
use trendsketch::sink::TrendSink;
use trendsketch::source::DocumentSource;
use trendsketch::source::JsonLinesSource;
use trendsketch::trending::TrendingResult;

#[derive(Parser)]
#[command(name = "trendwatch", about = "Track trending words in a stream of documents")]
struct Command {
    /// JSON-lines file of `{"title": ..., "text": ...}` documents; `-` reads stdin.
    #[arg(long, default_value = "-")]
    input: PathBuf,

    /// Write the latest `{word: probability}` ranking to this file.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Sketch relative error.
    #[arg(long, default_value_t = DEFAULT_EPSILON)]
    epsilon: f64,

    /// Sketch failure probability.
    #[arg(long, default_value_t = DEFAULT_DELTA)]
    delta: f64,

    /// Number of most recent documents that make up the window.
    #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
    window_size: usize,

    /// Number of ranked words.
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Candidate words kept per document [default: 4 * top-k].
    #[arg(long)]
    candidate_cap: Option<usize>,

    /// Seconds between polls of the input.
    #[arg(long, default_value_t = 3.5)]
    poll_interval: f64,

    /// Seed for the sketch hash functions.
    #[arg(long, default_value_t = DEFAULT_HASH_SEED)]
    seed: u64,

    /// Newline-separated file of additional stopwords.
    #[arg(long)]
    stopwords_file: Option<PathBuf>,

    /// Do not use the built-in stopword list.
    #[arg(long)]
    no_default_stopwords: bool,
}

impl Command {
    fn config(&self) -> anyhow::Result<TrendConfig> {
        let poll_interval = Duration::try_from_secs_f64(self.poll_interval)
            .with_context(|| format!("invalid poll interval: {}", self.poll_interval))?;
        let mut builder = TrendConfig::builder()
            .epsilon(self.epsilon)
            .delta(self.delta)
            .window_size(self.window_size)
            .top_k(self.top_k)
            .poll_interval(poll_interval)
            .hash_seed(self.seed);
        if let Some(candidate_cap) = self.candidate_cap {
            builder = builder.candidate_cap(candidate_cap);
        }
        if self.no_default_stopwords {
            builder = builder.stopwords(Vec::<String>::new());
        }
        if let Some(path) = &self.stopwords_file {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read stopwords from {}", path.display()))?;
            builder = builder.extra_stopwords(
                content
                    .lines()
                    .map(|line| line.trim().to_lowercase())
                    .filter(|line| !line.is_empty()),
            );
        }
        Ok(builder.build()?)
    }

    fn source(&self) -> anyhow::Result<Box<dyn DocumentSource + Send>> {
        if self.input.as_os_str() == "-" {
            return Ok(Box::new(JsonLinesSource::new(BufReader::new(io::stdin()))));
        }
        let file = File::open(&self.input)
            .with_context(|| format!("failed to open {}", self.input.display()))?;
        Ok(Box::new(JsonLinesSource::new(BufReader::new(file))))
    }
}

/// Logs every ranking and mirrors it to a file when one is configured.
struct CliSink {
    log: LogSink,
    file: Option<JsonFileSink>,
}

impl TrendSink for CliSink {
    fn publish(&mut self, ranked: &TrendingResult) -> Result<(), Error> {
        self.log.publish(ranked)?;
        match &mut self.file {
            Some(file) => file.publish(ranked),
            None => Ok(()),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cmd = Command::parse();
    let config = cmd.config()?;
    let source = cmd.source()?;
    let mut sink = CliSink {
        log: LogSink,
        file: cmd.output.clone().map(JsonFileSink::new),
    };

    // The handle lives until the end of main; the run ends when the input does.
    let (_handle, signal) = stop_channel();
    let mut pipeline = Pipeline::new(config);
    let report = pipeline.run(source, &mut sink, signal);
    tracing::info!(
        processed = report.documents_processed,
        empty = report.empty_documents,
        dropped = report.documents_dropped,
        source_failures = report.source_failures,
        publish_failures = report.publish_failures,
        "done"
    );
    Ok(())
}
