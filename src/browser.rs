//! Best-effort browser launching.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::platform::Platform;

/// Open `url` in the default browser. Failures are logged and otherwise ignored.
pub fn open(platform: &dyn Platform, url: &str) {
    match platform.open_url(url) {
        Ok(()) => info!(%url, "Opened browser"),
        Err(e) => warn!(%url, error = %e, "Failed to launch browser"),
    }
}

/// Open `url` after `delay` on a detached task.
///
/// The returned handle only exists for tests; callers normally drop it.
pub fn open_after(platform: Arc<dyn Platform>, url: String, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        open(platform.as_ref(), &url);
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use crate::error::Error;

    /// Platform double that records opened URLs and script runs.
    #[derive(Default)]
    pub(crate) struct RecordingPlatform {
        pub scripts: &'static [&'static str],
        pub fail_open: bool,
        pub script_exit: i32,
        pub opened: Mutex<Vec<String>>,
        /// `(dir, script)` pairs, in call order.
        pub ran: Mutex<Vec<(PathBuf, PathBuf)>>,
    }

    impl Platform for RecordingPlatform {
        fn start_scripts(&self) -> &'static [&'static str] {
            self.scripts
        }

        fn open_url(&self, url: &str) -> Result<(), Error> {
            if self.fail_open {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "xdg-open not found",
                )));
            }
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }

        fn run_script(&self, dir: &Path, script: &Path) -> Result<i32, Error> {
            self.ran
                .lock()
                .unwrap()
                .push((dir.to_path_buf(), script.to_path_buf()));
            Ok(self.script_exit)
        }
    }

    #[test]
    fn test_open_failure_is_swallowed() {
        let platform = RecordingPlatform {
            fail_open: true,
            ..Default::default()
        };
        open(&platform, "http://localhost:8080");
        assert!(platform.opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_after_delay() {
        let platform = Arc::new(RecordingPlatform::default());
        let handle = open_after(
            platform.clone(),
            "http://localhost:4321".to_string(),
            Duration::from_millis(10),
        );
        handle.await.unwrap();

        assert_eq!(
            *platform.opened.lock().unwrap(),
            vec!["http://localhost:4321".to_string()]
        );
    }
}
