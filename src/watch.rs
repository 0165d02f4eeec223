//! Watch mode - debounced rebuilds on source, ontology and demo payload changes
//!
//! The notify backend pushes events into an mpsc channel; a single loop owns
//! both debouncers, the pipeline and the cache, so rebuilds never overlap.

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::manifest::Manifest;
use crate::ontology::Ontology;
use crate::pipeline::{BuildOutcome, Pipeline, PipelineError, StageSelection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Debouncing { deadline: Instant },
}

/// Trailing-edge debouncer: fires once, `delay` after the last change.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    state: DebounceState,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: DebounceState::Idle,
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Arm, or push the deadline out if already armed.
    pub fn on_change(&mut self, now: Instant) {
        self.state = DebounceState::Debouncing {
            deadline: now + self.delay,
        };
    }

    /// True exactly once per burst, at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.state {
            DebounceState::Debouncing { deadline } if now >= deadline => {
                self.state = DebounceState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Time until the pending deadline, if any.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match self.state {
            DebounceState::Idle => None,
            DebounceState::Debouncing { deadline } => Some(deadline.saturating_duration_since(now)),
        }
    }

    pub fn cancel(&mut self) {
        self.state = DebounceState::Idle;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Full,
    Demo,
}

/// Maps a changed path to the rebuild it calls for.
#[derive(Debug, Clone)]
pub struct TriggerMap {
    source_dir: PathBuf,
    ontology_path: PathBuf,
    demo_dir: Option<PathBuf>,
}

impl TriggerMap {
    pub fn new(source_dir: &Path, ontology_path: &Path, demo_dir: Option<&Path>) -> Self {
        Self {
            source_dir: resolve(source_dir),
            ontology_path: resolve_file(ontology_path),
            demo_dir: demo_dir.map(resolve),
        }
    }

    pub fn classify(&self, path: &Path) -> Option<Trigger> {
        if is_ignored(path) {
            return None;
        }
        if path.starts_with(&self.source_dir) || path == self.ontology_path {
            return Some(Trigger::Full);
        }
        match &self.demo_dir {
            Some(dir) if path.starts_with(dir) => Some(Trigger::Demo),
            _ => None,
        }
    }
}

/// Create, remove and content modifications count; access and metadata do not.
pub fn is_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    }
}

/// Hidden files and editor backups.
fn is_ignored(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with('.')
        || name.ends_with('~')
        || name.ends_with(".swp")
        || name.ends_with(".swx")
        || name.ends_with(".tmp")
}

fn resolve(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Canonical form of a file that may not exist yet.
fn resolve_file(path: &Path) -> PathBuf {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => resolve(&watch_dir_of(parent)).join(name),
        _ => path.to_path_buf(),
    }
}

fn watch_dir_of(parent: &Path) -> PathBuf {
    if parent.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        parent.to_path_buf()
    }
}

/// Manifest and ontology from the last successful full run
#[derive(Debug, Clone)]
pub struct BuildCache {
    pub manifest: Arc<Manifest>,
    pub ontology: Arc<Ontology>,
}

impl From<BuildOutcome> for BuildCache {
    fn from(outcome: BuildOutcome) -> Self {
        Self {
            manifest: Arc::new(outcome.manifest),
            ontology: Arc::new(outcome.ontology),
        }
    }
}

pub struct WatchContext<'a> {
    pipeline: &'a Pipeline,
    selection: StageSelection,
    cache: Option<BuildCache>,
}

impl<'a> WatchContext<'a> {
    pub fn new(pipeline: &'a Pipeline, selection: StageSelection, cache: Option<BuildCache>) -> Self {
        Self {
            pipeline,
            selection,
            cache,
        }
    }

    pub fn can_rebuild_demo_only(&self) -> bool {
        self.cache.is_some()
    }

    pub fn cache(&self) -> Option<&BuildCache> {
        self.cache.as_ref()
    }

    /// Full run; the cache is replaced only on success.
    pub fn rebuild_full(&mut self) -> Result<(), PipelineError> {
        let outcome = self.pipeline.run(&self.selection)?;
        self.cache = Some(BuildCache::from(outcome));
        Ok(())
    }

    pub fn rebuild_demo(&mut self) -> Result<(), PipelineError> {
        match &self.cache {
            Some(cache) => {
                self.pipeline.run_demo(&cache.manifest, &cache.ontology)?;
                info!(stage = "demo", "rebuilt demo from cache");
                Ok(())
            }
            None => self.rebuild_full(),
        }
    }
}

/// Block forever, rebuilding on changes. Returns when the backend goes away.
pub fn watch(
    pipeline: &Pipeline,
    selection: StageSelection,
    cache: Option<BuildCache>,
) -> Result<(), PipelineError> {
    let config = pipeline.config();
    let demo_dir = selection.demo.then(|| config.demo_dir.as_path());
    let triggers = TriggerMap::new(&config.source_dir, &config.ontology_path, demo_dir);

    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(tx)?;

    let ontology_dir = watch_dir_of(config.ontology_path.parent().unwrap_or(Path::new("")));
    let mut roots = vec![
        (config.source_dir.clone(), RecursiveMode::Recursive),
        (ontology_dir, RecursiveMode::NonRecursive),
    ];
    if let Some(dir) = demo_dir {
        roots.push((dir.to_path_buf(), RecursiveMode::Recursive));
    }
    for (path, mode) in &roots {
        if !path.exists() {
            warn!(path = %path.display(), "not watching missing path");
            continue;
        }
        watcher.watch(path, *mode)?;
        debug!(path = %path.display(), ?mode, "watching");
    }

    let mut context = WatchContext::new(pipeline, selection, cache);
    let mut full = Debouncer::new(config.debounce());
    let mut demo = Debouncer::new(config.debounce());
    info!("watching for changes");

    loop {
        let now = Instant::now();
        let timeout = [full.remaining(now), demo.remaining(now)].into_iter().flatten().min();
        let received = match timeout {
            Some(timeout) => rx.recv_timeout(timeout),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(Ok(event)) if is_change(&event.kind) => {
                for path in &event.paths {
                    match triggers.classify(path) {
                        Some(Trigger::Full) => full.on_change(Instant::now()),
                        Some(Trigger::Demo) => demo.on_change(Instant::now()),
                        None => {}
                    }
                }
            }
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!(error = %e, "watch backend error"),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let now = Instant::now();
        if full.poll(now) {
            demo.cancel();
            info!("change detected, rebuilding");
            if let Err(e) = context.rebuild_full() {
                error!(error = %e, "rebuild failed");
            }
        } else if demo.poll(now) {
            if !context.can_rebuild_demo_only() {
                info!("demo payload changed without a cached build, running full rebuild");
            }
            if let Err(e) = context.rebuild_demo() {
                error!(error = %e, "demo rebuild failed");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;
    use crate::manifest::fixtures::manifest;
    use crate::styles::Style;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind};

    const DELAY: Duration = Duration::from_millis(150);

    #[test]
    fn test_burst_fires_once() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);

        for i in 0..10 {
            debouncer.on_change(start + Duration::from_millis(i * 20));
        }
        let last = start + Duration::from_millis(180);

        assert!(!debouncer.poll(last + Duration::from_millis(149)));
        assert!(debouncer.poll(last + DELAY));
        assert!(!debouncer.poll(last + DELAY * 4));
        assert_eq!(debouncer.state(), DebounceState::Idle);
    }

    #[test]
    fn test_remaining_and_cancel() {
        let now = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        assert_eq!(debouncer.remaining(now), None);

        debouncer.on_change(now);
        assert_eq!(debouncer.remaining(now + Duration::from_millis(100)), Some(Duration::from_millis(50)));
        assert_eq!(debouncer.remaining(now + DELAY * 2), Some(Duration::ZERO));

        debouncer.cancel();
        assert!(!debouncer.poll(now + DELAY * 2));
    }

    #[test]
    fn test_classify() {
        let triggers = TriggerMap::new(
            Path::new("/work/icons"),
            Path::new("/work/ontology.json"),
            Some(Path::new("/work/demo")),
        );

        assert_eq!(triggers.classify(Path::new("/work/icons/outline/home.svg")), Some(Trigger::Full));
        assert_eq!(triggers.classify(Path::new("/work/ontology.json")), Some(Trigger::Full));
        assert_eq!(triggers.classify(Path::new("/work/demo/app.js")), Some(Trigger::Demo));
        assert_eq!(triggers.classify(Path::new("/work/package.json")), None);
        assert_eq!(triggers.classify(Path::new("/work/icons/outline/.home.svg.swp")), None);
        assert_eq!(triggers.classify(Path::new("/work/demo/app.js~")), None);
    }

    #[test]
    fn test_demo_dir_ignored_unless_selected() {
        let triggers = TriggerMap::new(Path::new("/work/icons"), Path::new("/work/ontology.json"), None);
        assert_eq!(triggers.classify(Path::new("/work/demo/app.js")), None);
    }

    #[test]
    fn test_event_kinds() {
        assert!(is_change(&EventKind::Create(CreateKind::File)));
        assert!(is_change(&EventKind::Modify(ModifyKind::Data(DataChange::Content))));
        assert!(!is_change(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions))));
        assert!(!is_change(&EventKind::Access(AccessKind::Read)));
    }

    #[test]
    fn test_demo_only_requires_cache() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuildConfig::default().rooted_at(dir.path());
        let pipeline = Pipeline::new(config);

        let cold = WatchContext::new(&pipeline, StageSelection::all(), None);
        assert!(!cold.can_rebuild_demo_only());

        let cache = BuildCache {
            manifest: Arc::new(manifest(&[(Style::Outline, "home", "<path/>")])),
            ontology: Arc::new(Ontology::default()),
        };
        let warm = WatchContext::new(&pipeline, StageSelection::all(), Some(cache));
        assert!(warm.can_rebuild_demo_only());
    }

    #[test]
    fn test_demo_rebuild_uses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuildConfig::default().rooted_at(dir.path());
        fs::create_dir_all(&config.demo_dir).unwrap();
        fs::write(config.demo_dir.join("styles.css"), "body{}").unwrap();
        fs::write(config.demo_dir.join("app.js"), "1;").unwrap();
        let pipeline = Pipeline::new(config.clone());

        let cache = BuildCache {
            manifest: Arc::new(manifest(&[(Style::Outline, "home", "<path/>")])),
            ontology: Arc::new(Ontology::default()),
        };
        let mut context = WatchContext::new(&pipeline, StageSelection::all(), Some(cache));
        context.rebuild_demo().unwrap();

        let page = fs::read_to_string(config.output_dir.join("index.html")).unwrap();
        assert!(page.contains("1 icons"));
        assert!(!config.output_dir.join("svg").exists());
    }

    #[test]
    fn test_failed_rebuild_keeps_cache() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuildConfig::default().rooted_at(dir.path());
        fs::write(&config.ontology_path, "{ not json").unwrap();
        let pipeline = Pipeline::new(config);

        let cache = BuildCache {
            manifest: Arc::new(manifest(&[(Style::Solid, "home", "<path/>")])),
            ontology: Arc::new(Ontology::default()),
        };
        let mut context = WatchContext::new(&pipeline, StageSelection::all(), Some(cache));
        assert!(context.rebuild_full().is_err());
        assert_eq!(context.cache().unwrap().manifest.len(), 1);
    }
}
