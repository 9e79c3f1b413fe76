//! Decide how to launch a project directory.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Error;
use crate::platform::Platform;

/// A project-provided start script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartScript {
    /// Project directory; the script runs with this as its working directory.
    pub dir: PathBuf,
    /// Relative to `dir` and explicitly so (`./start.sh`), never a bare name.
    pub path: PathBuf,
}

/// What to do with a project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchPlan {
    RunScript(StartScript),
    RunServer,
}

/// Pick a start script if the platform's candidates exist, else the built-in server.
pub fn resolve(directory: &Path, platform: &dyn Platform) -> LaunchPlan {
    match find_start_script(directory, platform.start_scripts()) {
        Ok(script) => {
            info!(script = %script.path.display(), "Found start script");
            LaunchPlan::RunScript(script)
        }
        Err(e) => {
            debug!(error = %e, "Using built-in server");
            LaunchPlan::RunServer
        }
    }
}

/// Look for `candidates` in order; the first regular file wins.
pub fn find_start_script(directory: &Path, candidates: &[&str]) -> Result<StartScript, Error> {
    candidates
        .iter()
        .find(|name| directory.join(name).is_file())
        .map(|name| StartScript {
            dir: directory.to_path_buf(),
            path: explicit_relative(Path::new(name)),
        })
        .ok_or_else(|| Error::NoStartScriptFound(directory.to_path_buf()))
}

/// Prefix `./` onto bare relative paths so they are never looked up on `PATH`.
pub fn explicit_relative(path: &Path) -> PathBuf {
    match path.components().next() {
        Some(Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)) => {
            path.to_path_buf()
        }
        _ => Path::new(".").join(path),
    }
}

/// Run the script with the terminal attached and return its exit code.
pub async fn run_script(script: &StartScript, platform: Arc<dyn Platform>) -> Result<i32, Error> {
    info!(script = %script.path.display(), dir = %script.dir.display(), "Running start script");
    let StartScript { dir, path } = script.clone();
    let code = tokio::task::spawn_blocking(move || platform.run_script(&dir, &path))
        .await
        .map_err(std::io::Error::from)??;
    info!(code, "Start script exited");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::tests::RecordingPlatform;
    use std::fs;
    use tempfile::TempDir;

    const UNIX: &[&str] = &["start.sh"];
    const WINDOWS: &[&str] = &["start.ps1", "start.bat"];

    fn platform(scripts: &'static [&'static str]) -> RecordingPlatform {
        RecordingPlatform {
            scripts,
            ..Default::default()
        }
    }

    #[test]
    fn test_start_sh_selected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("start.sh"), "#!/bin/sh\n").unwrap();

        let plan = resolve(temp.path(), &platform(UNIX));
        assert_eq!(
            plan,
            LaunchPlan::RunScript(StartScript {
                dir: temp.path().to_path_buf(),
                path: PathBuf::from("./start.sh"),
            })
        );
    }

    #[test]
    fn test_no_script_runs_server() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("index.html"), "").unwrap();
        // Windows scripts don't count on unix.
        fs::write(temp.path().join("start.bat"), "").unwrap();

        assert_eq!(resolve(temp.path(), &platform(UNIX)), LaunchPlan::RunServer);
    }

    #[test]
    fn test_directory_named_like_script_ignored() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("start.sh")).unwrap();

        assert_eq!(resolve(temp.path(), &platform(UNIX)), LaunchPlan::RunServer);
    }

    #[test]
    fn test_windows_order() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("start.bat"), "").unwrap();

        let script = find_start_script(temp.path(), WINDOWS).unwrap();
        assert_eq!(script.path, Path::new(".").join("start.bat"));

        fs::write(temp.path().join("start.ps1"), "").unwrap();
        let script = find_start_script(temp.path(), WINDOWS).unwrap();
        assert_eq!(script.path, Path::new(".").join("start.ps1"));
    }

    #[test]
    fn test_missing_script_error() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            find_start_script(temp.path(), UNIX),
            Err(Error::NoStartScriptFound(_))
        ));
    }

    #[test]
    fn test_explicit_relative() {
        assert_eq!(
            explicit_relative(Path::new("start.sh")),
            PathBuf::from("./start.sh")
        );
        assert_eq!(
            explicit_relative(Path::new("site/start.sh")),
            PathBuf::from("./site/start.sh")
        );
        assert_eq!(
            explicit_relative(Path::new("./start.sh")),
            PathBuf::from("./start.sh")
        );
        assert_eq!(
            explicit_relative(Path::new("../site/start.sh")),
            PathBuf::from("../site/start.sh")
        );
        assert_eq!(
            explicit_relative(Path::new("/srv/site/start.sh")),
            PathBuf::from("/srv/site/start.sh")
        );
    }

    #[test]
    fn test_script_path_is_relative_to_directory() {
        let script = find_start_script(Path::new("src"), &["lib.rs"]).unwrap();
        assert_eq!(script.dir, PathBuf::from("src"));
        assert_eq!(script.path, PathBuf::from("./lib.rs"));
    }

    #[tokio::test]
    async fn test_run_script_passes_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("start.sh"), "exit 5\n").unwrap();
        let platform = Arc::new(RecordingPlatform {
            scripts: UNIX,
            script_exit: 5,
            ..Default::default()
        });
        let script = find_start_script(temp.path(), UNIX).unwrap();

        let code = run_script(&script, platform.clone()).await.unwrap();

        assert_eq!(code, 5);
        assert_eq!(
            *platform.ran.lock().unwrap(),
            vec![(temp.path().to_path_buf(), PathBuf::from("./start.sh"))]
        );
    }
}
