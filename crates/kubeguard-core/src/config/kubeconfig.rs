//! Kubeconfig path resolution
//!
//! Turns a possibly-empty, possibly-relative kubeconfig path into the path
//! handed to kubectl through `KUBECONFIG`:
//!
//! 1. empty input resolves to the platform default (`~/.kube/config`)
//! 2. inside WSL, Windows drive and UNC paths are translated to POSIX paths
//! 3. a leading `~/` is replaced with the home directory
//! 4. environment variable references are expanded; no existence check

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Kubeconfig path could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KubeconfigError {
    #[error("unable to determine home directory")]
    HomeDirUnavailable,
}

/// The parts of the host the resolver reads
///
/// Kept behind a trait so resolution can be exercised without touching the
/// real process environment.
#[cfg_attr(test, mockall::automock)]
pub trait HostEnvironment: Send + Sync {
    /// Value of an environment variable, if set
    fn var(&self, key: &str) -> Option<String>;

    /// Home directory as reported by the operating system
    fn home_dir(&self) -> Option<PathBuf>;

    /// Whether the host is Windows
    fn is_windows(&self) -> bool;

    /// Contents of `/proc/version`, if readable
    fn proc_version(&self) -> Option<String>;

    /// Whether a path exists on disk
    fn exists(&self, path: &Path) -> bool;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl HostEnvironment for SystemEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn is_windows(&self) -> bool {
        cfg!(windows)
    }

    fn proc_version(&self) -> Option<String> {
        std::fs::read_to_string("/proc/version").ok()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Resolves kubeconfig paths against a host environment
#[derive(Debug, Clone, Default)]
pub struct PathResolver<E = SystemEnvironment> {
    env: E,
}

impl PathResolver<SystemEnvironment> {
    /// Resolver backed by the real process environment
    pub fn system() -> Self {
        Self::default()
    }
}

impl<E: HostEnvironment> PathResolver<E> {
    /// Resolver backed by a custom environment
    pub fn with_environment(env: E) -> Self {
        Self { env }
    }

    /// Resolve a kubeconfig path
    ///
    /// Fails only when the input starts with `~/` and no home directory can
    /// be found.
    pub fn resolve(&self, input: &str) -> Result<PathBuf, KubeconfigError> {
        if input.is_empty() {
            return Ok(self.default_path());
        }

        let mut path = input.to_string();
        if self.is_wsl() && is_windows_path(&path) {
            path = self.convert_windows_path_to_wsl(&path);
        }

        if let Some(rest) = path.strip_prefix("~/") {
            let home = self.home()?;
            return Ok(home.join(rest));
        }

        let expanded = shellexpand::env_with_context_no_errors(&path, |name| {
            Some(self.env.var(name).unwrap_or_default())
        });
        Ok(PathBuf::from(expanded.as_ref()))
    }

    /// Platform default kubeconfig location
    ///
    /// Never fails: when no home directory is known at all the relative path
    /// `.kube/config` is returned.
    pub fn default_path(&self) -> PathBuf {
        if let Ok(home) = self.home() {
            return home.join(".kube").join("config");
        }

        if self.env.is_windows() {
            if let Some(profile) = self.non_empty_var("USERPROFILE") {
                return PathBuf::from(profile).join(".kube").join("config");
            }
        }

        PathBuf::from(".kube").join("config")
    }

    /// Whether the process runs inside Windows Subsystem for Linux
    pub fn is_wsl(&self) -> bool {
        let from_kernel = self
            .env
            .proc_version()
            .map(|version| {
                let version = version.to_lowercase();
                version.contains("microsoft") || version.contains("wsl")
            })
            .unwrap_or(false);

        from_kernel
            || self.non_empty_var("WSL_DISTRO_NAME").is_some()
            || self.non_empty_var("WSLENV").is_some()
    }

    fn home(&self) -> Result<PathBuf, KubeconfigError> {
        if let Some(home) = self.non_empty_var("HOME") {
            return Ok(PathBuf::from(home));
        }
        self.env
            .home_dir()
            .filter(|home| !home.as_os_str().is_empty())
            .ok_or(KubeconfigError::HomeDirUnavailable)
    }

    fn non_empty_var(&self, key: &str) -> Option<String> {
        self.env.var(key).filter(|value| !value.is_empty())
    }

    fn convert_windows_path_to_wsl(&self, path: &str) -> String {
        if !has_drive_letter(path) {
            return path.replace('\\', "/");
        }

        let drive = path[..1].to_lowercase();
        let rest = path[2..].replace('\\', "/");

        if let Some(index) = rest.find("/.kube/") {
            if let Some(home) = self.non_empty_var("HOME") {
                let candidate = format!("{}{}", home, &rest[index..]);
                if self.env.exists(Path::new(&candidate)) {
                    return candidate;
                }
            }
        }

        format!("/mnt/{}{}", drive, rest)
    }
}

fn has_drive_letter(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic()
}

/// Drive-letter (`C:\...`) or UNC (`\\server\...`) form
fn is_windows_path(path: &str) -> bool {
    has_drive_letter(path) || path.starts_with("\\\\")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[derive(Default)]
    struct FakeEnvironment {
        vars: HashMap<String, String>,
        home_dir: Option<PathBuf>,
        windows: bool,
        proc_version: Option<String>,
        existing: HashSet<PathBuf>,
    }

    impl FakeEnvironment {
        fn with_var(mut self, key: &str, value: &str) -> Self {
            self.vars.insert(key.to_string(), value.to_string());
            self
        }

        fn with_existing(mut self, path: &str) -> Self {
            self.existing.insert(PathBuf::from(path));
            self
        }

        fn wsl(mut self) -> Self {
            self.proc_version = Some(
                "Linux version 5.15.90.1-microsoft-standard-WSL2 (gcc 11.2.0)".to_string(),
            );
            self
        }
    }

    impl HostEnvironment for FakeEnvironment {
        fn var(&self, key: &str) -> Option<String> {
            self.vars.get(key).cloned()
        }

        fn home_dir(&self) -> Option<PathBuf> {
            self.home_dir.clone()
        }

        fn is_windows(&self) -> bool {
            self.windows
        }

        fn proc_version(&self) -> Option<String> {
            self.proc_version.clone()
        }

        fn exists(&self, path: &Path) -> bool {
            self.existing.contains(path)
        }
    }

    fn resolver(env: FakeEnvironment) -> PathResolver<FakeEnvironment> {
        PathResolver::with_environment(env)
    }

    #[test]
    fn test_empty_input_uses_home() {
        let r = resolver(FakeEnvironment::default().with_var("HOME", "/home/user"));
        assert_eq!(r.resolve("").unwrap(), PathBuf::from("/home/user/.kube/config"));
    }

    #[test]
    fn test_default_ignores_kubeconfig_env() {
        let r = resolver(
            FakeEnvironment::default()
                .with_var("HOME", "/home/user")
                .with_var("KUBECONFIG", "/first/config:/second/config"),
        );
        assert_eq!(r.default_path(), PathBuf::from("/home/user/.kube/config"));
    }

    #[test]
    fn test_default_falls_back_to_os_home_dir() {
        let env = FakeEnvironment {
            home_dir: Some(PathBuf::from("/var/lib/operator")),
            ..Default::default()
        };
        assert_eq!(
            resolver(env).default_path(),
            PathBuf::from("/var/lib/operator/.kube/config")
        );
    }

    #[test]
    fn test_default_uses_userprofile_on_windows() {
        let env = FakeEnvironment {
            windows: true,
            ..Default::default()
        }
        .with_var("USERPROFILE", "/c/Users/user");
        assert_eq!(
            resolver(env).default_path(),
            PathBuf::from("/c/Users/user").join(".kube").join("config")
        );
    }

    #[test]
    fn test_default_relative_when_nothing_known() {
        let r = resolver(FakeEnvironment::default());
        assert_eq!(r.default_path(), PathBuf::from(".kube").join("config"));
    }

    #[test]
    fn test_tilde_expansion() {
        let r = resolver(FakeEnvironment::default().with_var("HOME", "/home/user"));
        assert_eq!(
            r.resolve("~/.kube/custom").unwrap(),
            PathBuf::from("/home/user/.kube/custom")
        );
    }

    #[test]
    fn test_tilde_without_home_fails() {
        let r = resolver(FakeEnvironment::default());
        assert_eq!(
            r.resolve("~/.kube/custom"),
            Err(KubeconfigError::HomeDirUnavailable)
        );
    }

    #[test]
    fn test_env_var_expansion() {
        let r = resolver(
            FakeEnvironment::default()
                .with_var("KUBE_DIR", "/etc/kube")
                .with_var("CLUSTER", "prod"),
        );
        assert_eq!(
            r.resolve("$KUBE_DIR/${CLUSTER}.yaml").unwrap(),
            PathBuf::from("/etc/kube/prod.yaml")
        );
    }

    #[test]
    fn test_unset_env_var_expands_to_empty() {
        let r = resolver(FakeEnvironment::default());
        assert_eq!(
            r.resolve("/configs/$MISSING/config").unwrap(),
            PathBuf::from("/configs//config")
        );
    }

    #[test]
    fn test_plain_path_returned_unchanged() {
        let r = resolver(FakeEnvironment::default().with_var("HOME", "/home/user"));
        assert_eq!(
            r.resolve("/does/not/exist").unwrap(),
            PathBuf::from("/does/not/exist")
        );
        assert_eq!(r.resolve("relative/config").unwrap(), PathBuf::from("relative/config"));
    }

    #[test]
    fn test_wsl_detection() {
        assert!(resolver(FakeEnvironment::default().wsl()).is_wsl());
        assert!(resolver(FakeEnvironment::default().with_var("WSL_DISTRO_NAME", "Ubuntu")).is_wsl());
        assert!(resolver(FakeEnvironment::default().with_var("WSLENV", "WT_SESSION")).is_wsl());
        assert!(!resolver(FakeEnvironment::default().with_var("WSLENV", "")).is_wsl());

        let native = FakeEnvironment {
            proc_version: Some("Linux version 6.1.0-18-amd64".to_string()),
            ..Default::default()
        };
        assert!(!resolver(native).is_wsl());
    }

    #[test]
    fn test_wsl_drive_path_translates_to_mnt() {
        let r = resolver(FakeEnvironment::default().wsl().with_var("HOME", "/home/user"));
        assert_eq!(
            r.resolve(r"C:\Users\user\.kube\config").unwrap(),
            PathBuf::from("/mnt/c/Users/user/.kube/config")
        );
    }

    #[test]
    fn test_wsl_prefers_existing_home_kube_dir() {
        let r = resolver(
            FakeEnvironment::default()
                .wsl()
                .with_var("HOME", "/home/user")
                .with_existing("/home/user/.kube/config"),
        );
        assert_eq!(
            r.resolve(r"D:\Users\someone\.kube\config").unwrap(),
            PathBuf::from("/home/user/.kube/config")
        );
    }

    #[test]
    fn test_wsl_unc_path_flips_separators() {
        let r = resolver(FakeEnvironment::default().wsl());
        assert_eq!(
            r.resolve(r"\\server\share\kubeconfig").unwrap(),
            PathBuf::from("//server/share/kubeconfig")
        );
    }

    #[test]
    fn test_windows_path_untouched_outside_wsl() {
        let r = resolver(FakeEnvironment::default());
        assert_eq!(
            r.resolve(r"C:\Users\user\.kube\config").unwrap(),
            PathBuf::from(r"C:\Users\user\.kube\config")
        );
    }

    #[test]
    fn test_windows_path_detection() {
        assert!(is_windows_path(r"C:\Users"));
        assert!(is_windows_path("z:/tmp"));
        assert!(is_windows_path(r"\\host\share"));
        assert!(!is_windows_path("/home/user"));
        assert!(!is_windows_path("1:/nope"));
        assert!(!is_windows_path("C"));
    }

    #[test]
    fn test_mocked_environment_home_lookup() {
        let mut env = MockHostEnvironment::new();
        env.expect_var().returning(|_| None);
        env.expect_proc_version().returning(|| None);
        env.expect_home_dir()
            .times(1)
            .returning(|| Some(PathBuf::from("/Users/dev")));

        let r = PathResolver::with_environment(env);
        assert_eq!(
            r.resolve("~/clusters/staging").unwrap(),
            PathBuf::from("/Users/dev/clusters/staging")
        );
    }
}
