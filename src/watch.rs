//! Watch Mode
//!
//! Refreshes the workspace when the filesystem changes. Bursts of events collapse into one
//! refresh per quiet window; events under ignored directories and on the explorer's own
//! generated files never trigger one.

use crate::config::ExplorerConfig;
use crate::error::ExplorerError;
use crate::explorer::{Explorer, RenderSink};
use crate::fs::FileSystem;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Watch mode configuration
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Quiet period after the last accepted event before refreshing
    pub debounce: Duration,
    /// Path components whose events are ignored
    pub ignore_names: Vec<String>,
    /// File names the explorer regenerates on every refresh
    pub generated_names: Vec<String>,
}

impl WatchOptions {
    pub fn from_config(config: &ExplorerConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.watch.debounce_ms),
            ignore_names: config.watch.ignore_names.clone(),
            generated_names: vec![config.layout.source_list_file.clone()],
        }
    }
}

/// Filesystem change event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeEvent {
    Created(PathBuf),
    Modified(PathBuf),
    Removed(PathBuf),
    Renamed { from: PathBuf, to: PathBuf },
}

impl ChangeEvent {
    /// Path the change lands on (the destination of a rename).
    pub fn path(&self) -> &Path {
        match self {
            ChangeEvent::Created(p) | ChangeEvent::Modified(p) | ChangeEvent::Removed(p) => p,
            ChangeEvent::Renamed { to, .. } => to,
        }
    }
}

/// Convert a notify event; access and other metadata-only events are dropped.
pub fn convert_event(event: Event) -> Option<ChangeEvent> {
    match event.kind {
        EventKind::Create(_) => event.paths.first().map(|p| ChangeEvent::Created(p.clone())),
        EventKind::Modify(notify::event::ModifyKind::Name(_)) => match event.paths.as_slice() {
            [from, to, ..] => Some(ChangeEvent::Renamed {
                from: from.clone(),
                to: to.clone(),
            }),
            [only] => Some(ChangeEvent::Modified(only.clone())),
            [] => None,
        },
        EventKind::Modify(notify::event::ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => event.paths.first().map(|p| ChangeEvent::Modified(p.clone())),
        EventKind::Remove(_) => event.paths.first().map(|p| ChangeEvent::Removed(p.clone())),
        _ => None,
    }
}

/// Collects change events until a quiet window has passed.
pub struct EventBatcher {
    options: WatchOptions,
    root: PathBuf,
    pending: HashSet<PathBuf>,
    last_event: Option<Instant>,
    self_written: HashSet<PathBuf>,
}

impl EventBatcher {
    pub fn new(options: WatchOptions) -> Self {
        Self {
            options,
            root: PathBuf::new(),
            pending: HashSet::new(),
            last_event: None,
            self_written: HashSet::new(),
        }
    }

    /// Match ignored names only below `root`.
    pub fn with_root(mut self, root: &Path) -> Self {
        self.root = root.to_path_buf();
        self
    }

    /// Queue an event. Returns false when the event is ignored.
    pub fn add_event(&mut self, event: &ChangeEvent, now: Instant) -> bool {
        if let ChangeEvent::Renamed { from, to } = event {
            // A rename out of an ignored location still changes what is visible.
            if self.should_ignore(from) && self.should_ignore(to) {
                return false;
            }
        } else if self.should_ignore(event.path()) {
            return false;
        }
        self.pending.insert(event.path().to_path_buf());
        self.last_event = Some(now);
        true
    }

    /// Whether events are pending and the quiet window has elapsed.
    pub fn is_ready(&self, now: Instant) -> bool {
        match self.last_event {
            Some(last) => {
                !self.pending.is_empty() && now.duration_since(last) >= self.options.debounce
            }
            None => false,
        }
    }

    /// Get and clear pending paths, sorted.
    pub fn take_batch(&mut self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.pending.drain().collect();
        paths.sort();
        self.last_event = None;
        paths
    }

    /// Ignore events on files a refresh just wrote, until the next refresh.
    pub fn expect_writes(&mut self, paths: &[PathBuf]) {
        self.self_written = paths.iter().cloned().collect();
    }

    fn should_ignore(&self, path: &Path) -> bool {
        if self.self_written.contains(path) {
            return true;
        }
        let generated = path
            .file_name()
            .map(|name| self.options.generated_names.iter().any(|g| name == g.as_str()))
            .unwrap_or(false);
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        generated
            || relative.components().any(|c| match c {
                Component::Normal(name) => {
                    self.options.ignore_names.iter().any(|i| name == i.as_str())
                }
                _ => false,
            })
    }
}

/// Long-running refresh-on-change loop over one explorer.
pub struct WatchDaemon<'e, F: FileSystem> {
    explorer: &'e mut Explorer<F>,
    options: WatchOptions,
    running: Arc<AtomicBool>,
}

impl<'e, F: FileSystem> WatchDaemon<'e, F> {
    pub fn new(explorer: &'e mut Explorer<F>, options: WatchOptions) -> Self {
        Self {
            explorer,
            options,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that ends the loop when cleared.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Refresh once, then refresh after every quiet window that follows a change.
    ///
    /// A failed refresh is logged and the previous tree stays displayed.
    pub fn run(&mut self, sink: &mut dyn RenderSink) -> Result<(), ExplorerError> {
        self.running.store(true, Ordering::SeqCst);

        let mut batcher = EventBatcher::new(self.options.clone()).with_root(self.explorer.root());
        let report = self.explorer.refresh(sink)?;
        batcher.expect_writes(&report.written);

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            if let Err(e) = tx.send(res) {
                error!("Error sending watch event: {}", e);
            }
        })?;
        let root = self.explorer.root().to_path_buf();
        watcher.watch(&root, RecursiveMode::Recursive)?;
        info!(
            workspace = %root.display(),
            debounce_ms = self.options.debounce.as_millis(),
            "Watching workspace"
        );

        let poll = self.options.debounce.min(Duration::from_millis(100));
        while self.running.load(Ordering::SeqCst) {
            match rx.recv_timeout(poll) {
                Ok(Ok(event)) => {
                    if let Some(change) = convert_event(event) {
                        if batcher.add_event(&change, Instant::now()) {
                            debug!(?change, "Queued change");
                        }
                    }
                }
                Ok(Err(e)) => warn!("Watch error: {}", e),
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    error!("Watcher channel disconnected");
                    break;
                }
            }

            if batcher.is_ready(Instant::now()) {
                let batch = batcher.take_batch();
                info!(paths = batch.len(), "Change batch ready, refreshing");
                match self.explorer.refresh(sink) {
                    Ok(report) => batcher.expect_writes(&report.written),
                    Err(e) => warn!(error = %e, "Refresh failed, keeping previous tree"),
                }
            }
        }

        info!("Watch stopped");
        Ok(())
    }
}
