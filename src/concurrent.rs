//! Concurrent resolution on Tokio.
//!
//! Each base pattern gets its own unit, and so does every directory found
//! while walking a matched directory. Units share one bounded channel; a
//! supervisor waits for all of them before the channel closes, so the end
//! of the stream means every unit has finished.

use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::{mpsc, Semaphore};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, trace, warn};

use crate::entry::{Entry, EntryKind};
use crate::error::WildpathError;
use crate::finder::Finder;
use crate::pattern::{parse, Parsed, SegmentMatcher};
use crate::resolver::{child_targets, is_missing, join, listing_dir, Target};

type Item = Result<Entry, WildpathError>;

// ---------------------------------------------------------------------------
// FileStream
// ---------------------------------------------------------------------------

/// Stream of entries produced by [`Finder::files_async`].
///
/// Order across units is unspecified. Dropping the stream stops every unit
/// at its next yield.
pub struct FileStream {
    inner: ReceiverStream<Item>,
}

impl Stream for FileStream {
    type Item = Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

pub(crate) fn spawn(finder: Finder, patterns: Vec<String>, cancel: CancellationToken) -> FileStream {
    let (tx, rx) = mpsc::channel(finder.channel_capacity());
    tokio::spawn(supervise(finder, patterns, tx, cancel));
    FileStream { inner: ReceiverStream::new(rx) }
}

async fn supervise(
    finder: Finder,
    patterns: Vec<String>,
    tx: mpsc::Sender<Item>,
    cancel: CancellationToken,
) {
    let tracker = TaskTracker::new();
    let permits = Arc::new(Semaphore::new(finder.max_concurrency()));

    for pattern in patterns {
        if cancel.is_cancelled() || tx.is_closed() {
            break;
        }
        debug!(base = %pattern, "dispatching base pattern");
        let unit = Unit {
            finder:  finder.clone(),
            base:    Arc::from(pattern.as_str()),
            tx:      tx.clone(),
            tracker: tracker.clone(),
            cancel:  cancel.clone(),
            permits: Arc::clone(&permits),
        };
        tracker.spawn(unit.run(Task::Target(Target::root(pattern)), 0));
    }

    tracker.close();
    tracker.wait().await;

    if cancel.is_cancelled() {
        let _ = tx.send(Err(WildpathError::Cancelled)).await;
    }
}

// ---------------------------------------------------------------------------
// Unit
// ---------------------------------------------------------------------------

enum Task {
    Target(Target),

    /// An existing directory: yield it, emit its files, dispatch its subdirectories.
    Dir(PathBuf),
}

/// One independently scheduled piece of a resolve.
#[derive(Clone)]
struct Unit {
    finder:  Finder,
    base:    Arc<str>,
    tx:      mpsc::Sender<Item>,
    tracker: TaskTracker,
    cancel:  CancellationToken,
    permits: Arc<Semaphore>,
}

impl Unit {
    fn run(self, task: Task, offset: usize) -> BoxFuture<'static, ()> {
        async move {
            let _permit = tokio::select! {
                permit = Arc::clone(&self.permits).acquire_owned() => match permit {
                    Ok(p) => p,
                    Err(_) => return,
                },
                _ = self.cancel.cancelled() => return,
            };

            if let Err(err) = self.drive(task, offset).await {
                warn!(base = %self.base, error = %err, "unit failed");
                let _ = self
                    .tx
                    .send(Err(WildpathError::BasePattern {
                        pattern: self.base.to_string(),
                        source:  Box::new(err),
                    }))
                    .await;
            }
        }
        .boxed()
    }

    async fn drive(&self, task: Task, offset: usize) -> Result<(), WildpathError> {
        let mut stack = vec![task];

        while let Some(task) = stack.pop() {
            if self.stopped() {
                return Ok(());
            }
            match task {
                Task::Target(Target::Pattern { base, rest }) => {
                    let split = match parse(&rest) {
                        Parsed::Literal(path) => {
                            stack.push(Task::Target(Target::Leaf(join(&base, path))));
                            continue;
                        }
                        Parsed::Wildcard(split) => split,
                    };
                    let dir = listing_dir(&self.finder, &base, &split);
                    let matcher = SegmentMatcher::new(split.segment)?;
                    let children = list_matches(&dir, &matcher).await?;
                    trace!(dir = %dir.display(), segment = split.segment, matches = children.len(), "listed directory");

                    let targets = child_targets(children, split.right);
                    stack.extend(targets.into_iter().rev().map(Task::Target));
                }
                Task::Target(Target::Leaf(path)) => match tokio::fs::metadata(&path).await {
                    Ok(meta) if meta.is_dir() => stack.push(Task::Dir(path)),
                    Ok(meta) => {
                        let kind = EntryKind::from_file_type(meta.file_type());
                        if !self.emit(Entry::new(path, kind, offset)).await {
                            return Ok(());
                        }
                    }
                    Err(e) if is_missing(&e) => {
                        if self.finder.create_non_existing()
                            && !self.emit(Entry::new(path, EntryKind::Missing, offset)).await
                        {
                            return Ok(());
                        }
                    }
                    Err(e) => return Err(WildpathError::io(path, e)),
                },
                Task::Dir(path) => {
                    if !self.walk_dir(path, offset).await? {
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns `false` once the unit should stop.
    async fn walk_dir(&self, path: PathBuf, offset: usize) -> Result<bool, WildpathError> {
        if self.finder.include_directories()
            && !self.emit(Entry::new(path.clone(), EntryKind::Dir, offset)).await
        {
            return Ok(false);
        }

        let mut read = tokio::fs::read_dir(&path)
            .await
            .map_err(|e| WildpathError::io(&path, e))?;

        while let Some(child) = read
            .next_entry()
            .await
            .map_err(|e| WildpathError::io(&path, e))?
        {
            let child_path = child.path();
            let ft = child
                .file_type()
                .await
                .map_err(|e| WildpathError::io(&child_path, e))?;

            if ft.is_dir() {
                if self.stopped() {
                    return Ok(false);
                }
                trace!(dir = %child_path.display(), "dispatching directory unit");
                self.tracker
                    .spawn(self.clone().run(Task::Dir(child_path), offset + 1));
            } else if !self
                .emit(Entry::new(child_path, EntryKind::from_file_type(ft), offset + 1))
                .await
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Cancelled, or the stream was dropped.
    fn stopped(&self) -> bool {
        self.cancel.is_cancelled() || self.tx.is_closed()
    }

    /// Send one entry. `false` when the unit should stop.
    async fn emit(&self, entry: Entry) -> bool {
        if self.stopped() {
            return false;
        }
        let path = entry.path.clone();
        self.finder.record(&entry);
        if self.tx.send(Ok(entry)).await.is_err() {
            // Never delivered.
            self.finder.forget(&path);
            return false;
        }
        true
    }
}

/// Async twin of the sequential listing: matching children of `dir`, with
/// whether each is a directory (symlinks followed).
async fn list_matches(dir: &Path, matcher: &SegmentMatcher) -> Result<Vec<(PathBuf, bool)>, WildpathError> {
    let mut read = match tokio::fs::read_dir(dir).await {
        Ok(read) => read,
        Err(e) if is_missing(&e) => return Ok(Vec::new()),
        Err(e) => return Err(WildpathError::io(dir, e)),
    };

    let mut out = Vec::new();
    while let Some(child) = read.next_entry().await.map_err(|e| WildpathError::io(dir, e))? {
        if !matcher.is_match(&child.file_name()) {
            continue;
        }
        let path = child.path();
        let ft = child.file_type().await.map_err(|e| WildpathError::io(&path, e))?;
        let is_dir = ft.is_dir()
            || (ft.is_symlink()
                && tokio::fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false));
        out.push((path, is_dir));
    }
    Ok(out)
}
