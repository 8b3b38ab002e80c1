//! Request-level orchestration.
//!
//! One request owns one [`Workspace`] from acquisition to the end of the
//! scan. The collecting entry points hold it on the stack; the streaming
//! entry point hands it to the producer thread, which drops it before
//! reporting the final summary.

use crate::config::{RoutemapConfig, ScanConfig};
use crate::core::RouteRecord;
use crate::declarations::{extract_declarations, DeclarationScan};
use crate::detection::detect_with_config;
use crate::errors::Result;
use crate::extraction::{extract_routes, RouteIter, RouteScan, ScanSummary};
use crate::io::Workspace;
use crossbeam::channel::{bounded, Receiver};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info_span, Span};

/// Records buffered between the producer thread and the consumer.
const STREAM_CAPACITY: usize = 64;

/// Clone `repo_url`, extract every route, remove the clone.
pub fn scan_repository(repo_url: &str, config: &RoutemapConfig) -> Result<RouteScan> {
    let workspace = Workspace::acquire(repo_url, &config.workspace)?;
    Ok(extract_routes(workspace.path(), &config.scan))
}

/// Clone `repo_url`, extract its declarations, remove the clone.
pub fn scan_declarations(repo_url: &str, config: &RoutemapConfig) -> Result<DeclarationScan> {
    let workspace = Workspace::acquire(repo_url, &config.workspace)?;
    Ok(extract_declarations(workspace.path(), &config.scan))
}

/// Clone `repo_url` and stream its routes as they are extracted.
///
/// Validation and clone errors are returned before any thread is started.
pub fn stream_routes(repo_url: &str, config: &RoutemapConfig) -> Result<RouteStream> {
    let workspace = Workspace::acquire(repo_url, &config.workspace)?;
    Ok(RouteStream::from_workspace(workspace, config.scan.clone()))
}

enum StreamEvent {
    Route(RouteRecord),
    Finished(ScanSummary),
}

/// Consumer side of a streamed scan.
///
/// Dropping the stream early disconnects the channel; the producer notices
/// on its next send, drops its workspace and exits. `Drop` waits for it.
pub struct RouteStream {
    receiver: Option<Receiver<StreamEvent>>,
    handle: Option<JoinHandle<()>>,
    summary: Option<ScanSummary>,
}

impl RouteStream {
    /// Stream routes from a workspace; the workspace is removed when the
    /// producer finishes or is abandoned.
    pub fn from_workspace(workspace: Workspace, scan: ScanConfig) -> Self {
        let root = workspace.path().to_path_buf();
        Self::spawn(root, Some(workspace), scan)
    }

    /// Stream routes from a local directory, which is left untouched.
    pub fn from_directory(root: impl Into<PathBuf>, scan: ScanConfig) -> Self {
        Self::spawn(root.into(), None, scan)
    }

    fn spawn(root: PathBuf, workspace: Option<Workspace>, scan: ScanConfig) -> Self {
        let (sender, receiver) = bounded(STREAM_CAPACITY);
        let parent = Span::current();

        let handle = thread::spawn(move || {
            let _span = info_span!(parent: &parent, "stream").entered();
            let detection = detect_with_config(&root, &scan);
            let mut routes = RouteIter::new(&root, detection, &scan);

            for route in routes.by_ref() {
                if sender.send(StreamEvent::Route(route)).is_err() {
                    debug!("Route consumer disconnected; stopping scan");
                    return;
                }
            }

            let summary = routes.summary();
            drop(routes);
            drop(workspace);
            // The consumer may already be gone
            let _ = sender.send(StreamEvent::Finished(summary));
        });

        Self {
            receiver: Some(receiver),
            handle: Some(handle),
            summary: None,
        }
    }

    /// Final summary, available once the stream has been drained.
    pub fn summary(&self) -> Option<&ScanSummary> {
        self.summary.as_ref()
    }

    fn finish(&mut self) {
        self.receiver = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Route producer thread panicked");
            }
        }
    }
}

impl Iterator for RouteStream {
    type Item = RouteRecord;

    fn next(&mut self) -> Option<RouteRecord> {
        let event = self.receiver.as_ref()?.recv();
        match event {
            Ok(StreamEvent::Route(route)) => Some(route),
            Ok(StreamEvent::Finished(summary)) => {
                self.summary = Some(summary);
                self.finish();
                None
            }
            Err(_) => {
                self.finish();
                None
            }
        }
    }
}

impl Drop for RouteStream {
    fn drop(&mut self) {
        self.finish();
    }
}
