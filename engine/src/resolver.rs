use crate::defaults::BUNDLED_PREFIX;
use crate::upgrade::engine_version;
use crate::variables::read_variables;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Maps a theme name to the form used for equality checks.
///
/// Whether `Dark` and `dark` name the same directory depends on the
/// filesystem, so the rule is injected rather than hard-coded.
pub trait NameNormalizer: Send + Sync {
    fn normalize(&self, name: &str) -> String;
}

impl<F> NameNormalizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn normalize(&self, name: &str) -> String {
        self(name)
    }
}

/// Names compare byte for byte
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseSensitive;

impl NameNormalizer for CaseSensitive {
    fn normalize(&self, name: &str) -> String {
        name.to_string()
    }
}

/// Names compare ignoring case
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitive;

impl NameNormalizer for CaseInsensitive {
    fn normalize(&self, name: &str) -> String {
        name.to_lowercase()
    }
}

/// Normalization matching the default filesystem of the current platform
pub fn platform_normalizer() -> Arc<dyn NameNormalizer> {
    if cfg!(any(windows, target_os = "macos")) {
        Arc::new(CaseInsensitive)
    } else {
        Arc::new(CaseSensitive)
    }
}

/// The two places themes live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeRoots {
    /// Shipped with the application, read-only
    pub bundled: PathBuf,
    /// User-writable; clones are created here
    pub user: PathBuf,
}

impl ThemeRoots {
    pub fn new(bundled: impl Into<PathBuf>, user: impl Into<PathBuf>) -> Self {
        Self {
            bundled: bundled.into(),
            user: user.into(),
        }
    }

    /// True iff `path` lies inside the user-writable root
    pub fn is_user_path(&self, path: &Path) -> bool {
        path.starts_with(&self.user)
    }
}

/// A discovered theme directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeDescriptor {
    pub path: PathBuf,
    pub editable: bool,
    pub engine_version: u32,
}

impl ThemeDescriptor {
    /// Directory name, which is also the theme's logical name
    pub fn name(&self) -> String {
        dir_name(&self.path)
    }

    /// Read the engine version from disk and build the descriptor
    pub async fn load(path: PathBuf, roots: &ThemeRoots) -> Self {
        let variables = read_variables(&path).await;
        Self {
            editable: roots.is_user_path(&path),
            engine_version: engine_version(&variables),
            path,
        }
    }
}

pub(crate) fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Subdirectories of the bundled root followed by those of the user root.
///
/// Each root is listed in name order; a missing root contributes nothing.
pub async fn scan_theme_dirs(roots: &ThemeRoots) -> Vec<PathBuf> {
    let mut themes = list_subdirectories(&roots.bundled).await;
    themes.extend(list_subdirectories(&roots.user).await);
    themes
}

async fn list_subdirectories(root: &Path) -> Vec<PathBuf> {
    let mut entries = match tokio::fs::read_dir(root).await {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Theme root {} not readable: {e}", root.display());
            return Vec::new();
        }
    };

    let mut dirs = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let is_dir = match entry.file_type().await {
                    Ok(file_type) => file_type.is_dir(),
                    Err(_) => false,
                };
                if is_dir {
                    dirs.push(entry.path());
                }
            }
            Ok(None) => break,
            Err(e) => {
                log::warn!("Failed to read entry in {}: {e}", root.display());
                break;
            }
        }
    }

    dirs.sort();
    dirs
}

/// Finds theme directories by logical name within the last scan
pub struct ThemeResolver {
    roots: ThemeRoots,
    themes: Vec<PathBuf>,
    normalizer: Arc<dyn NameNormalizer>,
}

impl ThemeResolver {
    pub fn new(roots: ThemeRoots, normalizer: Arc<dyn NameNormalizer>) -> Self {
        Self {
            roots,
            themes: Vec::new(),
            normalizer,
        }
    }

    /// Resolver over an already known list of directories
    pub fn with_themes(
        roots: ThemeRoots,
        themes: Vec<PathBuf>,
        normalizer: Arc<dyn NameNormalizer>,
    ) -> Self {
        Self {
            roots,
            themes,
            normalizer,
        }
    }

    /// Rebuild the theme list from disk
    pub async fn rescan(&mut self) {
        self.themes = scan_theme_dirs(&self.roots).await;
        log::debug!("Scanned {} theme directories", self.themes.len());
    }

    pub fn roots(&self) -> &ThemeRoots {
        &self.roots
    }

    pub fn normalizer(&self) -> Arc<dyn NameNormalizer> {
        Arc::clone(&self.normalizer)
    }

    pub fn themes(&self) -> &[PathBuf] {
        &self.themes
    }

    /// Logical names of every scanned theme, in scan order
    pub fn names(&self) -> Vec<String> {
        self.themes.iter().map(|path| dir_name(path)).collect()
    }

    /// Directory for a logical name. A leading `__` is ignored.
    pub fn resolve(&self, logical_name: &str) -> Option<&Path> {
        let name = logical_name
            .strip_prefix(BUNDLED_PREFIX)
            .unwrap_or(logical_name);
        let wanted = self.normalizer.normalize(name);

        self.themes
            .iter()
            .find(|path| self.normalizer.normalize(&dir_name(path)) == wanted)
            .map(PathBuf::as_path)
    }

    /// True iff the name resolves to a directory inside the user root
    pub fn is_editable(&self, logical_name: &str) -> bool {
        self.resolve(logical_name)
            .map(|path| self.roots.is_user_path(path))
            .unwrap_or(false)
    }

    pub async fn descriptor(&self, logical_name: &str) -> Option<ThemeDescriptor> {
        let path = self.resolve(logical_name)?.to_path_buf();
        Some(ThemeDescriptor::load(path, &self.roots).await)
    }

    pub async fn descriptors(&self) -> Vec<ThemeDescriptor> {
        let mut descriptors = Vec::with_capacity(self.themes.len());
        for path in &self.themes {
            descriptors.push(ThemeDescriptor::load(path.clone(), &self.roots).await);
        }
        descriptors
    }

    pub(crate) fn register(&mut self, path: PathBuf) {
        if !self.themes.contains(&path) {
            self.themes.push(path);
        }
    }

    pub(crate) fn forget(&mut self, path: &Path) {
        self.themes.retain(|theme| theme != path);
    }
}
