use std::fs::{self, File, OpenOptions};
use std::io::BufReader;
use std::io::BufWriter;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::SystemTime;

#[cfg(unix)]
use std::os::unix::io::AsRawFd;
#[cfg(unix)]
use std::time::{Duration, Instant};

use tracing::debug;
use tracing::warn;

use agent_gui_common::mutex_lock_or_recover;
use agent_gui_core::UiElement;

use crate::error::SessionError;
use crate::session_types::SessionData;
use crate::session_types::SessionId;

const MAP_FILE: &str = "map.json";
const RAW_FILE: &str = "raw.png";
const ANNOTATED_FILE: &str = "annotated.png";
const LOCK_FILE: &str = "map.lock";

/// Deterministic on-disk locations for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPaths {
    pub raw: PathBuf,
    pub annotated: PathBuf,
    pub map: PathBuf,
}

/// Owner of one session's on-disk snapshot.
///
/// All mutation funnels through this handle: an in-process mutex serializes
/// writers sharing the handle, an advisory file lock serializes writers in
/// other processes, and every save lands via write-to-temp + rename so a
/// reader can never observe a partially written snapshot. Stores bound to
/// different session IDs never contend.
pub struct SessionStore {
    id: SessionId,
    dir: PathBuf,
    write_guard: Mutex<()>,
}

impl SessionStore {
    /// Bind to a session under `root`.
    ///
    /// With an explicit `id`, binds to it whether or not the directory
    /// exists yet. With none, resolves the most recently modified existing
    /// session; when there is none, generates a fresh ID if
    /// `create_if_needed` is set, and fails with [`SessionError::NoSession`]
    /// otherwise.
    pub fn open(
        root: &Path,
        id: Option<&str>,
        create_if_needed: bool,
    ) -> Result<Self, SessionError> {
        let id = match id {
            Some(raw) => SessionId::try_new(raw)?,
            None => {
                let entries = list_sessions(root)?;
                match most_recent_session(&entries) {
                    Some(latest) => SessionId::try_new(latest)?,
                    None if create_if_needed => {
                        let generated = SessionId::generate();
                        debug!(session_id = %generated, "Generated new session id");
                        generated
                    }
                    None => return Err(SessionError::NoSession),
                }
            }
        };

        let dir = root.join(id.as_str());
        Ok(Self {
            id,
            dir,
            write_guard: Mutex::new(()),
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn paths(&self) -> SessionPaths {
        SessionPaths {
            raw: self.dir.join(RAW_FILE),
            annotated: self.dir.join(ANNOTATED_FILE),
            map: self.dir.join(MAP_FILE),
        }
    }

    /// Persist the full snapshot atomically. The last completed write wins.
    pub fn save(&self, data: &SessionData) -> Result<(), SessionError> {
        let _guard = mutex_lock_or_recover(&self.write_guard);
        let _lock = self.acquire_file_lock()?;
        self.write_snapshot(data)
    }

    /// Load the latest saved snapshot, or `None` if nothing has ever been
    /// saved for this session. Missing state is a normal outcome, not an
    /// error.
    pub fn load(&self) -> Result<Option<SessionData>, SessionError> {
        let path = self.dir.join(MAP_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path).map_err(|e| SessionError::io("open_snapshot", e))?;
        let reader = BufReader::new(file);
        let data = serde_json::from_reader(reader).map_err(|e| SessionError::Corrupt {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(data))
    }

    /// Remove all persisted state for this session. Subsequent loads return
    /// `None`. Clearing a session that was never saved is a no-op.
    pub fn clear(&self) -> Result<(), SessionError> {
        let _guard = mutex_lock_or_recover(&self.write_guard);
        if !self.dir.exists() {
            return Ok(());
        }
        fs::remove_dir_all(&self.dir).map_err(|e| SessionError::io("clear", e))?;
        debug!(session_id = %self.id, "Cleared session");
        Ok(())
    }

    /// Copy a freshly captured image into the session's raw-image slot and
    /// merge capture metadata, preserving any existing element map.
    pub fn update_screenshot(
        &self,
        source: &Path,
        application: Option<&str>,
        window: Option<&str>,
    ) -> Result<(), SessionError> {
        let _guard = mutex_lock_or_recover(&self.write_guard);
        let _lock = self.acquire_file_lock()?;

        let raw_path = self.dir.join(RAW_FILE);
        fs::copy(source, &raw_path).map_err(|e| SessionError::io("copy_screenshot", e))?;

        let mut data = self.load()?.unwrap_or_default();
        data.screenshot_path = Some(raw_path.display().to_string());
        if let Some(app) = application {
            data.application_name = Some(app.to_string());
        }
        if let Some(title) = window {
            data.window_title = Some(title.to_string());
        }
        data.touch();
        self.write_snapshot(&data)
    }

    /// Case-insensitive substring search across title, label, value and
    /// role. Empty result, not an error, when nothing matches or the
    /// session was never captured.
    pub fn find_elements(&self, query: &str) -> Result<Vec<UiElement>, SessionError> {
        let Some(data) = self.load()? else {
            return Ok(Vec::new());
        };
        Ok(data
            .ui_map
            .values()
            .filter(|el| el.matches_query(query))
            .cloned()
            .collect())
    }

    /// Direct map lookup by element ID.
    pub fn get_element(&self, id: &str) -> Result<Option<UiElement>, SessionError> {
        let Some(data) = self.load()? else {
            return Ok(None);
        };
        Ok(data.ui_map.get(id).cloned())
    }

    fn ensure_dir(&self) -> Result<(), SessionError> {
        fs::create_dir_all(&self.dir).map_err(|e| SessionError::io("create_dir", e))
    }

    fn write_snapshot(&self, data: &SessionData) -> Result<(), SessionError> {
        self.ensure_dir()?;

        // Per-process temp name: two processes racing on the same session
        // must not stomp each other's half-written temp file.
        let temp_path = self
            .dir
            .join(format!("{}.{}.tmp", MAP_FILE, std::process::id()));
        let file =
            File::create(&temp_path).map_err(|e| SessionError::io("create_temp", e))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, data).map_err(|e| SessionError::Persistence {
            operation: "write_json".to_string(),
            reason: e.to_string(),
        })?;

        fs::rename(&temp_path, self.dir.join(MAP_FILE))
            .map_err(|e| SessionError::io("rename", e))?;
        Ok(())
    }

    #[cfg(unix)]
    fn acquire_file_lock(&self) -> Result<File, SessionError> {
        const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

        self.ensure_dir()?;
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.dir.join(LOCK_FILE))
            .map_err(|e| SessionError::io("open_lock", e))?;

        let fd = lock_file.as_raw_fd();
        let start = Instant::now();
        let mut backoff = Duration::from_millis(1);

        loop {
            // SAFETY: `fd` comes from `as_raw_fd()` on a file that stays
            // open for the whole loop, so it is a valid descriptor.
            let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
            if result == 0 {
                return Ok(lock_file);
            }

            let err = std::io::Error::last_os_error();
            if err.raw_os_error() != Some(libc::EWOULDBLOCK)
                && err.raw_os_error() != Some(libc::EAGAIN)
            {
                return Err(SessionError::io("flock", err));
            }

            if start.elapsed() > LOCK_TIMEOUT {
                return Err(SessionError::Persistence {
                    operation: "acquire_lock".to_string(),
                    reason: "lock acquisition timed out after 5 seconds".to_string(),
                });
            }

            std::thread::sleep(backoff);
            backoff = (backoff * 2).min(Duration::from_millis(100));
        }
    }

    #[cfg(not(unix))]
    fn acquire_file_lock(&self) -> Result<File, SessionError> {
        // No advisory locking off unix; the in-process mutex still
        // serializes writers sharing this handle and rename stays atomic.
        self.ensure_dir()?;
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.dir.join(LOCK_FILE))
            .map_err(|e| SessionError::io("open_lock", e))
    }
}

/// List session directories under `root` with their modification times.
///
/// A missing root is a normal "no sessions yet" state.
pub fn list_sessions(root: &Path) -> Result<Vec<(String, SystemTime)>, SessionError> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut sessions = Vec::new();
    let entries = fs::read_dir(root).map_err(|e| SessionError::io("read_sessions_root", e))?;
    for entry in entries {
        let entry = entry.map_err(|e| SessionError::io("read_sessions_root", e))?;
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            warn!(entry = ?entry.file_name(), "Skipping non-UTF-8 session directory");
            continue;
        };
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        sessions.push((name, modified));
    }
    Ok(sessions)
}

/// Pick the most recently modified session from an explicit listing.
///
/// Ties break on the lexicographically larger name so the result is stable
/// regardless of directory iteration order.
pub fn most_recent_session(entries: &[(String, SystemTime)]) -> Option<&str> {
    entries
        .iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
        .map(|(name, _)| name.as_str())
}

/// Remove every session directory under `root`. Returns how many were
/// cleared.
pub fn clear_all_sessions(root: &Path) -> Result<usize, SessionError> {
    let sessions = list_sessions(root)?;
    for (name, _) in &sessions {
        fs::remove_dir_all(root.join(name)).map_err(|e| SessionError::io("clear_all", e))?;
    }
    Ok(sessions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use agent_gui_core::{AxNode, Rect, build_ui_map};
    use tempfile::TempDir;

    fn sample_data() -> SessionData {
        let tree = AxNode {
            role: "window".to_string(),
            title: Some("Untitled".to_string()),
            children: vec![
                AxNode {
                    role: "button".to_string(),
                    title: Some("Save".to_string()),
                    frame: Rect::new(10.0, 10.0, 80.0, 30.0),
                    ..Default::default()
                },
                AxNode {
                    role: "button".to_string(),
                    title: Some("Cancel".to_string()),
                    frame: Rect::new(100.0, 10.0, 80.0, 30.0),
                    ..Default::default()
                },
                AxNode {
                    role: "text field".to_string(),
                    value: Some("draft.txt".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let mut data = SessionData::new();
        data.ui_map = build_ui_map(&tree);
        data.application_name = Some("TextEdit".to_string());
        data
    }

    fn open_store(root: &Path, id: &str) -> SessionStore {
        SessionStore::open(root, Some(id), false).unwrap()
    }

    #[test]
    fn test_save_load_round_trip() {
        let root = TempDir::new().unwrap();
        let store = open_store(root.path(), "s1");
        let data = sample_data();

        store.save(&data).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_repeated_saves_are_idempotent() {
        let root = TempDir::new().unwrap();
        let store = open_store(root.path(), "s1");
        let data = sample_data();

        for _ in 0..5 {
            store.save(&data).unwrap();
        }
        assert_eq!(store.load().unwrap().unwrap(), data);
    }

    #[test]
    fn test_load_never_created_session_returns_none() {
        let root = TempDir::new().unwrap();
        let store = open_store(root.path(), "never-saved");
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_clear_then_load_returns_none() {
        let root = TempDir::new().unwrap();
        let store = open_store(root.path(), "s1");
        store.save(&sample_data()).unwrap();

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing again is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_snapshot_surfaces_error() {
        let root = TempDir::new().unwrap();
        let store = open_store(root.path(), "s1");
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.paths().map, b"{not json").unwrap();

        assert!(matches!(
            store.load(),
            Err(SessionError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_paths_layout() {
        let root = TempDir::new().unwrap();
        let store = open_store(root.path(), "abc");
        let paths = store.paths();
        assert_eq!(paths.raw, root.path().join("abc").join("raw.png"));
        assert_eq!(paths.annotated, root.path().join("abc").join("annotated.png"));
        assert_eq!(paths.map, root.path().join("abc").join("map.json"));
    }

    #[test]
    fn test_find_elements_substring_and_role() {
        let root = TempDir::new().unwrap();
        let store = open_store(root.path(), "s1");
        store.save(&sample_data()).unwrap();

        let save = store.find_elements("save").unwrap();
        assert_eq!(save.len(), 1);
        assert_eq!(save[0].title.as_deref(), Some("Save"));

        let buttons = store.find_elements("BUTTON").unwrap();
        assert_eq!(buttons.len(), 2);

        assert!(store.find_elements("no such thing").unwrap().is_empty());
    }

    #[test]
    fn test_find_elements_on_missing_session_is_empty() {
        let root = TempDir::new().unwrap();
        let store = open_store(root.path(), "nothing");
        assert!(store.find_elements("save").unwrap().is_empty());
    }

    #[test]
    fn test_get_element() {
        let root = TempDir::new().unwrap();
        let store = open_store(root.path(), "s1");
        store.save(&sample_data()).unwrap();

        assert!(store.get_element("B1").unwrap().is_some());
        assert!(store.get_element("B99").unwrap().is_none());
    }

    #[test]
    fn test_update_screenshot_preserves_ui_map() {
        let root = TempDir::new().unwrap();
        let store = open_store(root.path(), "s1");
        let data = sample_data();
        store.save(&data).unwrap();

        let shot = root.path().join("shot.png");
        fs::write(&shot, b"fake png bytes").unwrap();
        store
            .update_screenshot(&shot, Some("Finder"), Some("Documents"))
            .unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.ui_map, data.ui_map);
        assert_eq!(loaded.application_name.as_deref(), Some("Finder"));
        assert_eq!(loaded.window_title.as_deref(), Some("Documents"));
        assert!(loaded.screenshot_path.unwrap().ends_with("raw.png"));
        assert!(store.paths().raw.exists());
        assert!(loaded.last_update_time >= data.last_update_time);
    }

    #[test]
    fn test_update_screenshot_on_fresh_session() {
        let root = TempDir::new().unwrap();
        let store = open_store(root.path(), "fresh");
        let shot = root.path().join("shot.png");
        fs::write(&shot, b"png").unwrap();

        store.update_screenshot(&shot, None, None).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.ui_map.is_empty());
        assert!(loaded.screenshot_path.is_some());
    }

    #[test]
    fn test_open_with_explicit_id_does_not_require_directory() {
        let root = TempDir::new().unwrap();
        let store = SessionStore::open(root.path(), Some("later"), false).unwrap();
        assert_eq!(store.id().as_str(), "later");
        assert!(!store.dir().exists());
    }

    #[test]
    fn test_open_rejects_blank_id() {
        let root = TempDir::new().unwrap();
        assert!(matches!(
            SessionStore::open(root.path(), Some("  "), false),
            Err(SessionError::InvalidId(_))
        ));
    }

    #[test]
    fn test_open_without_id_and_no_sessions_fails() {
        let root = TempDir::new().unwrap();
        assert!(matches!(
            SessionStore::open(root.path(), None, false),
            Err(SessionError::NoSession)
        ));
    }

    #[test]
    fn test_open_without_id_generates_when_allowed() {
        let root = TempDir::new().unwrap();
        let store = SessionStore::open(root.path(), None, true).unwrap();
        assert!(store.id().as_str().contains('-'));
    }

    #[test]
    fn test_open_without_id_resolves_most_recent() {
        let root = TempDir::new().unwrap();
        let older = open_store(root.path(), "older");
        older.save(&sample_data()).unwrap();
        std::thread::sleep(Duration::from_millis(20));
        let newer = open_store(root.path(), "newer");
        newer.save(&sample_data()).unwrap();

        let resolved = SessionStore::open(root.path(), None, false).unwrap();
        assert_eq!(resolved.id().as_str(), "newer");

        // create_if_needed still prefers the existing session.
        let resolved = SessionStore::open(root.path(), None, true).unwrap();
        assert_eq!(resolved.id().as_str(), "newer");
    }

    #[test]
    fn test_most_recent_session_tie_break_is_stable() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1000);
        let entries = vec![
            ("aaa".to_string(), t),
            ("zzz".to_string(), t),
            ("mmm".to_string(), t),
        ];
        assert_eq!(most_recent_session(&entries), Some("zzz"));
    }

    #[test]
    fn test_clear_all_sessions() {
        let root = TempDir::new().unwrap();
        open_store(root.path(), "a").save(&sample_data()).unwrap();
        open_store(root.path(), "b").save(&sample_data()).unwrap();

        assert_eq!(clear_all_sessions(root.path()).unwrap(), 2);
        assert!(list_sessions(root.path()).unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_saves_yield_exactly_one_input() {
        let root = TempDir::new().unwrap();
        let store = Arc::new(open_store(root.path(), "contended"));

        let mut inputs = Vec::new();
        for i in 0..8 {
            let mut data = sample_data();
            data.application_name = Some(format!("App {}", i));
            inputs.push(data);
        }

        let handles: Vec<_> = inputs
            .iter()
            .cloned()
            .map(|data| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.save(&data).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let loaded = store.load().unwrap().unwrap();
        assert!(
            inputs.iter().any(|input| *input == loaded),
            "loaded snapshot must equal exactly one of the saved inputs"
        );
    }

    #[test]
    fn test_reads_run_while_writers_churn() {
        let root = TempDir::new().unwrap();
        let store = Arc::new(open_store(root.path(), "churn"));
        store.save(&sample_data()).unwrap();

        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..50 {
                    store.save(&sample_data()).unwrap();
                }
            })
        };

        for _ in 0..50 {
            // Every observed snapshot must parse cleanly; rename atomicity
            // means a reader never sees a partial write.
            let data = store.load().unwrap().unwrap();
            assert_eq!(data.ui_map.len(), 4);
        }
        writer.join().unwrap();
    }
}
