//! Test utilities for the auth crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled when running tests
//! or with the `test-support` feature.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::HeaderView;
use crate::domain::ports::{
    Confirmation, HeaderMount, NavigationOffer, Navigator, Notification, Notifier, Surface,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    /// Freeze the clock at `utc_now`.
    pub const fn at(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }
}

impl Default for FixtureClock {
    fn default() -> Self {
        Self::at(
            Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0)
                .single()
                .unwrap_or_else(Utc::now),
        )
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Shared [`FixtureClock`] as the controllers expect it.
pub fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock::default())
}

/// Notifier that remembers every toast.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Every notification so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.seen).clone()
    }

    /// Messages only, oldest first.
    pub fn messages(&self) -> Vec<String> {
        lock(&self.seen)
            .iter()
            .map(|notification| notification.message.clone())
            .collect()
    }

    /// The most recent notification.
    pub fn last(&self) -> Option<Notification> {
        lock(&self.seen).last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        lock(&self.seen).push(notification);
    }
}

/// Navigator that remembers requested navigations and offers.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    navigations: Mutex<Vec<(Surface, Duration)>>,
    offers: Mutex<Vec<NavigationOffer>>,
}

impl RecordingNavigator {
    /// Every navigation so far, oldest first.
    pub fn navigations(&self) -> Vec<(Surface, Duration)> {
        lock(&self.navigations).clone()
    }

    /// Every offer so far, oldest first.
    pub fn offers(&self) -> Vec<NavigationOffer> {
        lock(&self.offers).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: Surface, delay: Duration) {
        lock(&self.navigations).push((target, delay));
    }

    fn offer(&self, offer: NavigationOffer) {
        lock(&self.offers).push(offer);
    }
}

/// Header mount point that remembers every rendered view.
#[derive(Debug, Default)]
pub struct RecordingHeaderMount {
    views: Mutex<Vec<HeaderView>>,
}

impl RecordingHeaderMount {
    /// Every view mounted so far, oldest first.
    pub fn views(&self) -> Vec<HeaderView> {
        lock(&self.views).clone()
    }

    /// The view currently on screen.
    pub fn current(&self) -> Option<HeaderView> {
        lock(&self.views).last().cloned()
    }
}

impl HeaderMount for RecordingHeaderMount {
    fn mount(&self, view: &HeaderView) {
        lock(&self.views).push(view.clone());
    }
}

/// Confirmation prompt answering from a script, then a default.
#[derive(Debug)]
pub struct ScriptedConfirmation {
    answers: Mutex<VecDeque<bool>>,
    fallback: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirmation {
    /// Answer every prompt with `answer`.
    pub fn always(answer: bool) -> Self {
        Self::scripted([], answer)
    }

    /// Answer with `answers` in order, then `fallback`.
    pub fn scripted(answers: impl IntoIterator<Item = bool>, fallback: bool) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            fallback,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts asked so far.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

impl Confirmation for ScriptedConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        lock(&self.prompts).push(prompt.to_owned());
        lock(&self.answers).pop_front().unwrap_or(self.fallback)
    }
}

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.
    //!
    //! Storage tests go through `cap_std::fs::Dir` like the file store does,
    //! so fixtures and assertions never reach for `std::fs`.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Read a UTF-8 text file through `cap_std`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mivo_auth::test_support::cap_fs::{read_file_to_string, write_file};
    ///
    /// let path = std::env::temp_dir().join("mivo-cap-fs-read-example.txt");
    /// write_file(&path, b"{}\n")?;
    /// assert_eq!(read_file_to_string(&path)?, "{}\n");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn read_file_to_string(path: &Path) -> io::Result<String> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.read_to_string(Path::new(&file_name))
    }

    /// Write bytes to a file through `cap_std`.
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file name",
            )
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}

pub mod storage {
    //! Temporary file-backed storage.

    use tempfile::TempDir;

    use crate::outbound::storage::FileStorage;

    /// File storage inside a directory removed on drop.
    pub struct TempFileStorage {
        /// The store under test.
        pub storage: FileStorage,
        _directory: TempDir,
    }

    impl TempFileStorage {
        /// Create an empty store under a fresh temporary directory.
        ///
        /// # Panics
        /// Panics when the temporary directory cannot be created.
        pub fn new() -> Self {
            let directory = match TempDir::new() {
                Ok(directory) => directory,
                Err(error) => panic!("create temp dir: {error}"),
            };
            let storage = match FileStorage::open(directory.path().join("mivo-storage.json")) {
                Ok(storage) => storage,
                Err(error) => panic!("open file storage: {error}"),
            };
            Self {
                storage,
                _directory: directory,
            }
        }
    }

    impl Default for TempFileStorage {
        fn default() -> Self {
            Self::new()
        }
    }
}
