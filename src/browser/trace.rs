//! Performance trace capture
//!
//! Records a Chrome trace over the navigation and writes it as a
//! `{"traceEvents": [...]}` JSON file loadable in `chrome://tracing` and
//! DevTools. Events are streamed back over the session
//! (`Tracing.dataCollected`) and buffered until `Tracing.end` flushes the
//! remainder; the file is written only after `tracingComplete`, so a
//! stopped trace is always a complete one.

use crate::error::Result;
use chromiumoxide::cdp::browser_protocol::tracing::{
    EndParams, EventDataCollected, EventTracingComplete, StartParams, StartTransferMode,
    TraceConfig,
};
use chromiumoxide::Page;
use futures::StreamExt;
use parking_lot::Mutex;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

// Category set DevTools records for a performance profile, screenshots
// included.
const TRACE_CATEGORIES: &[&str] = &[
    "-*",
    "devtools.timeline",
    "v8.execute",
    "disabled-by-default-devtools.timeline",
    "disabled-by-default-devtools.timeline.frame",
    "toplevel",
    "blink.console",
    "blink.user_timing",
    "latencyInfo",
    "disabled-by-default-devtools.timeline.stack",
    "disabled-by-default-v8.cpu_profiler",
    "disabled-by-default-devtools.screenshot",
];

/// An in-progress trace recording.
pub struct TraceRecorder {
    path: PathBuf,
    events: Arc<Mutex<Vec<serde_json::Value>>>,
    collector: JoinHandle<()>,
}

impl TraceRecorder {
    /// Start tracing on the page.
    pub async fn start(page: &Page, path: PathBuf) -> Result<Self> {
        let events: Arc<Mutex<Vec<serde_json::Value>>> = Arc::new(Mutex::new(Vec::new()));

        let mut stream = page.event_listener::<EventDataCollected>().await?;
        let buffer = events.clone();
        let collector = tokio::spawn(async move {
            while let Some(chunk) = stream.next().await {
                buffer.lock().extend(chunk.value.iter().cloned());
            }
        });

        let mut params = StartParams::default();
        params.trace_config = Some(TraceConfig {
            included_categories: Some(TRACE_CATEGORIES.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        });
        params.transfer_mode = Some(StartTransferMode::ReportEvents);
        page.execute(params).await?;

        debug!("Tracing started");
        Ok(Self {
            path,
            events,
            collector,
        })
    }

    /// Stop tracing and write the trace file.
    ///
    /// Must run before the final DOM read so the file is flushed by the
    /// time the run's output appears.
    pub async fn stop(self, page: &Page) -> Result<()> {
        let mut complete = page.event_listener::<EventTracingComplete>().await?;
        page.execute(EndParams::default()).await?;

        // The engine flushes buffered dataCollected events before this
        // event fires.
        complete.next().await;
        self.collector.abort();

        let events = std::mem::take(&mut *self.events.lock());
        debug!("Writing {} trace events to {}", events.len(), self.path.display());

        let file = File::create(&self.path)?;
        serde_json::to_writer(
            BufWriter::new(file),
            &serde_json::json!({ "traceEvents": events }),
        )?;
        Ok(())
    }
}
