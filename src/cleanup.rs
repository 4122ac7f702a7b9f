use log::debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Paths to delete if the process is interrupted mid-install: the partial
/// archive in the cache and the staging extraction directory.
#[derive(Default)]
pub struct CleanupContext {
    paths: Vec<PathBuf>,
}

impl CleanupContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: PathBuf) {
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    /// Stop tracking `path`, e.g. once the step that produced it succeeded.
    pub fn remove(&mut self, path: &Path) {
        self.paths.retain(|p| p != path);
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    /// Best-effort removal of everything registered.
    pub fn cleanup(&self) {
        for path in &self.paths {
            debug!("Cleaning up: {:?}", path);
            if path.is_dir() {
                let _ = std::fs::remove_dir_all(path);
            } else {
                let _ = std::fs::remove_file(path);
            }
        }
    }
}

pub type SharedCleanupContext = Arc<Mutex<CleanupContext>>;

pub fn new_shared() -> SharedCleanupContext {
    Arc::new(Mutex::new(CleanupContext::new()))
}

/// Watches for Ctrl-C for the rest of the process. On interrupt, whatever
/// is registered in `ctx` at that moment is removed and the process exits
/// with status 130, whether or not anything was registered.
pub fn spawn_interrupt_handler(ctx: SharedCleanupContext) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupted, cleaning up...");
            with_context(&ctx, |ctx| ctx.cleanup());
            std::process::exit(130);
        }
    })
}

/// Runs `f` against the shared context, tolerating a poisoned lock.
pub fn with_context<T>(ctx: &SharedCleanupContext, f: impl FnOnce(&mut CleanupContext) -> T) -> T {
    let mut guard = ctx.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut guard)
}
