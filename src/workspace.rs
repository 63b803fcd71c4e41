//! Environment discovery: workspace root, home directory, and skill payload.
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Identifier of the bundled skill; also the name of every install directory.
pub const SKILL_ID: &str = "agnostic-prompt-standard";

/// Environment variable that overrides the payload location.
pub const PAYLOAD_ENV: &str = "APS_PAYLOAD_DIR";

/// Walk up from `start` and return the first directory containing `.git`.
///
/// `.git` may be a directory or a file (worktrees and submodules use a file).
#[must_use]
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let start = dunce::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Return the user's home directory from `HOME` (or `USERPROFILE` on Windows).
///
/// # Errors
///
/// Returns [`ConfigError::HomeNotFound`] if neither variable is set.
pub fn home_dir() -> Result<PathBuf, ConfigError> {
    let var = |name: &str| std::env::var_os(name).filter(|v| !v.is_empty());
    let home = if cfg!(target_os = "windows") {
        var("USERPROFILE").or_else(|| var("HOME"))
    } else {
        var("HOME")
    };
    home.map(PathBuf::from).ok_or(ConfigError::HomeNotFound)
}

/// Expand a leading `~` or `~/` to `home`.
#[must_use]
pub fn expand_home(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) if rest.as_os_str().is_empty() => home.to_path_buf(),
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Turn a user-supplied path into an absolute one.
///
/// Expands `~`, joins relative paths onto `cwd`, and canonicalizes when the
/// path exists so that `..` segments disappear from the rendered plan.
#[must_use]
pub fn absolutize(path: &Path, cwd: &Path, home: &Path) -> PathBuf {
    let expanded = expand_home(path, home);
    let joined = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };
    dunce::canonicalize(&joined).unwrap_or(joined)
}

/// Pick the workspace root: the `--root` flag if given, else the enclosing
/// git repository of `cwd`.
#[must_use]
pub fn resolve_workspace_root(flag: Option<&Path>, cwd: &Path, home: &Path) -> Option<PathBuf> {
    flag.map_or_else(
        || find_repo_root(cwd),
        |root| Some(absolutize(root, cwd, home)),
    )
}

/// Candidate payload directories in priority order.
///
/// 1. explicit `--payload` flag
/// 2. `APS_PAYLOAD_DIR`
/// 3. `<exe dir>/payload/<skill>` (archive layout)
/// 4. `<exe dir>/../share/aps/payload/<skill>` (system package layout)
/// 5. `<repo>/skill/<skill>` relative to a `target/<profile>/` build dir
/// 6. `<cwd>/skill/<skill>` (running from a checkout)
#[must_use]
pub fn payload_candidates(
    flag: Option<&Path>,
    env: Option<&Path>,
    exe_dir: Option<&Path>,
    cwd: &Path,
) -> Vec<PathBuf> {
    if let Some(flag) = flag {
        return vec![flag.to_path_buf()];
    }
    if let Some(env) = env {
        return vec![env.to_path_buf()];
    }

    let mut out = Vec::new();
    if let Some(exe_dir) = exe_dir {
        out.push(exe_dir.join("payload").join(SKILL_ID));
        out.push(exe_dir.join("../share/aps/payload").join(SKILL_ID));
        out.push(exe_dir.join("../../skill").join(SKILL_ID));
    }
    out.push(cwd.join("skill").join(SKILL_ID));
    out
}

/// Locate the bundled skill payload directory.
///
/// # Errors
///
/// Returns [`ConfigError::PayloadNotFound`] listing every candidate checked
/// when none of them is a directory.
pub fn resolve_payload_dir(flag: Option<&Path>, cwd: &Path) -> Result<PathBuf, ConfigError> {
    let env = std::env::var_os(PAYLOAD_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    let exe = std::env::current_exe().ok();
    let exe_dir = exe.as_deref().and_then(Path::parent);

    let candidates = payload_candidates(flag, env.as_deref(), exe_dir, cwd);
    let found = candidates
        .iter()
        .find(|c| c.is_dir())
        .map(|c| dunce::canonicalize(c).unwrap_or_else(|_| c.clone()));
    found.ok_or(ConfigError::PayloadNotFound {
        searched: candidates,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn find_repo_root_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let root = find_repo_root(&nested).unwrap();
        assert_eq!(root, dunce::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn find_repo_root_accepts_git_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".git"), "gitdir: elsewhere").unwrap();
        assert!(find_repo_root(dir.path()).is_some());
    }

    #[test]
    fn expand_home_variants() {
        let home = Path::new("/home/u");
        assert_eq!(expand_home(Path::new("~"), home), PathBuf::from("/home/u"));
        assert_eq!(
            expand_home(Path::new("~/proj"), home),
            PathBuf::from("/home/u/proj")
        );
        assert_eq!(expand_home(Path::new("/abs"), home), PathBuf::from("/abs"));
        assert_eq!(
            expand_home(Path::new("~other/x"), home),
            PathBuf::from("~other/x")
        );
    }

    #[test]
    fn absolutize_joins_relative_onto_cwd() {
        let p = absolutize(
            Path::new("does-not-exist"),
            Path::new("/work"),
            Path::new("/home/u"),
        );
        assert_eq!(p, PathBuf::from("/work/does-not-exist"));
    }

    #[test]
    fn resolve_workspace_root_prefers_flag() {
        let dir = tempfile::tempdir().unwrap();
        let got = resolve_workspace_root(
            Some(dir.path()),
            Path::new("/elsewhere"),
            Path::new("/home/u"),
        )
        .unwrap();
        assert_eq!(got, dunce::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn payload_candidates_flag_wins() {
        let got = payload_candidates(
            Some(Path::new("/flag")),
            Some(Path::new("/env")),
            Some(Path::new("/bin")),
            Path::new("/cwd"),
        );
        assert_eq!(got, vec![PathBuf::from("/flag")]);
    }

    #[test]
    fn payload_candidates_env_before_exe() {
        let got = payload_candidates(None, Some(Path::new("/env")), None, Path::new("/cwd"));
        assert_eq!(got, vec![PathBuf::from("/env")]);
    }

    #[test]
    fn payload_candidates_default_order() {
        let got = payload_candidates(None, None, Some(Path::new("/opt/aps")), Path::new("/cwd"));
        assert_eq!(
            got,
            vec![
                PathBuf::from("/opt/aps/payload/agnostic-prompt-standard"),
                PathBuf::from("/opt/aps/../share/aps/payload/agnostic-prompt-standard"),
                PathBuf::from("/opt/aps/../../skill/agnostic-prompt-standard"),
                PathBuf::from("/cwd/skill/agnostic-prompt-standard"),
            ]
        );
    }

    #[test]
    fn resolve_payload_dir_uses_flag() {
        let dir = tempfile::tempdir().unwrap();
        let got = resolve_payload_dir(Some(dir.path()), Path::new("/")).unwrap();
        assert_eq!(got, dunce::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn resolve_payload_dir_missing_flag_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = resolve_payload_dir(Some(&missing), Path::new("/")).unwrap_err();
        assert!(matches!(err, ConfigError::PayloadNotFound { ref searched } if searched == &vec![missing.clone()]));
    }
}
