//! Hot reload of the rule file.
//!
//! The parent directory is watched rather than the file itself, so editors
//! that save by writing a temp file and renaming it over the original keep
//! triggering reloads.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::RedirectConfig;

/// Publishes every successfully reloaded config on a channel.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RedirectConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end of its update channel.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RedirectConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Dropping the returned handle stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, update_tx } = self;
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let target = path.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if touches(&event, &target) => reload(&target, &update_tx),
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %path.display(), "Config watcher started");
        Ok(watcher)
    }
}

fn reload(path: &Path, tx: &mpsc::UnboundedSender<RedirectConfig>) {
    match load_config(path) {
        Ok(config) => {
            tracing::info!(redirects = config.redirects.len(), "Redirect rules reloaded");
            if tx.send(config).is_err() {
                tracing::debug!("No receiver for reloaded config");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to reload config, keeping current rules");
        }
    }
}

/// True for a content change to `path`.
fn touches(event: &Event, path: &Path) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event
            .paths
            .iter()
            .any(|p| p.file_name().is_some() && p.file_name() == path.file_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_touches_only_the_watched_file() {
        let target = Path::new("/etc/redirects/rules.toml");

        assert!(touches(
            &event(EventKind::Modify(ModifyKind::Any), "/etc/redirects/rules.toml"),
            target
        ));
        assert!(touches(
            &event(EventKind::Create(CreateKind::File), "/etc/redirects/rules.toml"),
            target
        ));
        assert!(!touches(
            &event(EventKind::Modify(ModifyKind::Any), "/etc/redirects/other.toml"),
            target
        ));
        assert!(!touches(
            &event(EventKind::Access(notify::event::AccessKind::Any), "/etc/redirects/rules.toml"),
            target
        ));
    }

    #[test]
    fn test_failed_reload_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, "{ not json").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        reload(&path, &tx);
        assert!(rx.try_recv().is_err());

        std::fs::write(&path, r#"{ "redirects": [] }"#).unwrap();
        reload(&path, &tx);
        assert!(rx.try_recv().unwrap().redirects.is_empty());
    }
}
