//! Search path discovery.
//!
//! Environment files are looked up in the same layered contexts the host
//! tool reads its own configuration from. The list is ordered from lowest
//! to highest priority:
//!
//! 1. system: `/etc/drush`
//! 2. home: `~/.drush`
//! 3. site root: `<root>/drush`
//! 4. custom: every configured search path, in order
//! 5. site settings directory: `<root>/sites/<site>/drush`

use std::path::{Path, PathBuf};

use crate::settings::{Settings, DEFAULT_SITE};

/// System-wide configuration directory of the host tool.
pub const SYSTEM_CONTEXT: &str = "/etc/drush";

/// Directory name the host tool uses for per-user and per-site settings.
const TOOL_DIR: &str = "drush";

/// Site directory that holds settings shared by every site.
const SHARED_SITE: &str = "all";

/// The priority-ordered directories to scan for environment files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    roots: Vec<PathBuf>,
}

impl SearchPaths {
    /// Builds the search path list from settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use siteenv::Settings;
    /// use siteenv::environment::SearchPaths;
    /// use std::path::PathBuf;
    ///
    /// let settings = Settings::default()
    ///     .with_site_root("/var/www")
    ///     .with_search_path("/srv/envs")
    ///     .skip_global_contexts();
    /// let paths = SearchPaths::discover(&settings);
    ///
    /// assert_eq!(
    ///     paths.roots(),
    ///     &[
    ///         PathBuf::from("/var/www/drush"),
    ///         PathBuf::from("/srv/envs"),
    ///         PathBuf::from("/var/www/sites/all/drush"),
    ///     ]
    /// );
    /// ```
    #[must_use]
    pub fn discover(settings: &Settings) -> Self {
        let mut roots = Vec::new();

        if settings.global_contexts {
            roots.push(PathBuf::from(SYSTEM_CONTEXT));
            if let Some(home) = home::home_dir() {
                roots.push(home.join(format!(".{TOOL_DIR}")));
            }
        }

        if let Some(root) = &settings.site_root {
            roots.push(root.join(TOOL_DIR));
        }

        roots.extend(settings.search_paths.iter().cloned());

        if let Some(root) = &settings.site_root {
            roots.push(site_dir(root, &settings.site));
        }

        for root in &roots {
            log::debug!("Search path: {}", root.display());
        }

        Self { roots }
    }

    /// Wraps an explicit list of roots, lowest priority first.
    #[must_use]
    pub fn from_roots(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// The roots, lowest priority first.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

/// The settings directory of one site.
///
/// The `default` site keeps its settings in the shared `all` directory.
///
/// # Examples
///
/// ```
/// use siteenv::environment::paths::site_dir;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     site_dir(Path::new("/var/www"), "default"),
///     PathBuf::from("/var/www/sites/all/drush")
/// );
/// assert_eq!(
///     site_dir(Path::new("/var/www"), "example.com"),
///     PathBuf::from("/var/www/sites/example.com/drush")
/// );
/// ```
#[must_use]
pub fn site_dir(site_root: &Path, site: &str) -> PathBuf {
    let site = if site.is_empty() || site == DEFAULT_SITE {
        SHARED_SITE
    } else {
        site
    };
    site_root.join("sites").join(site).join(TOOL_DIR)
}
