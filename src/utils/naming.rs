//! Class name resolution and naming conventions

use crate::config::GeneratorConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Sub-namespace generated models live in
pub const MODELS_NAMESPACE: &str = "Models";

/// Extension of generated source files
pub const SOURCE_EXTENSION: &str = "php";

static UPPERCASE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]+").unwrap());
static REPEATED_UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"_{2,}").unwrap());

/// Turns short class names into fully-qualified ones and maps them onto disk
#[derive(Debug, Clone)]
pub struct NameResolver {
    root_namespace: String,
    base_path: PathBuf,
}

impl NameResolver {
    pub fn new<P: Into<PathBuf>>(root_namespace: &str, base_path: P) -> Self {
        Self {
            root_namespace: root_namespace.trim_matches('\\').to_string(),
            base_path: base_path.into(),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(&config.root_namespace, config.base_path.clone())
    }

    /// Root namespace with its trailing separator, e.g. `App\`
    pub fn root_namespace(&self) -> String {
        format!("{}\\", self.root_namespace)
    }

    /// Namespace short names are placed under, e.g. `App\Models`
    pub fn default_namespace(&self) -> String {
        format!("{}\\{}", self.root_namespace, MODELS_NAMESPACE)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a raw name into a fully-qualified class name.
    ///
    /// `Blog/Post` becomes `App\Models\Blog\Post`; names already under the
    /// root namespace are returned as-is, which makes this idempotent.
    pub fn qualify(&self, raw: &str) -> String {
        let name = raw.trim_start_matches(['\\', '/']);

        if name.starts_with(&self.root_namespace()) {
            return name.to_string();
        }

        format!("{}\\{}", self.default_namespace(), name.replace('/', "\\"))
    }

    /// Destination file for a fully-qualified class name
    pub fn path_for(&self, qualified: &str) -> PathBuf {
        let root = self.root_namespace();
        let relative = qualified.strip_prefix(root.as_str()).unwrap_or(qualified);

        let mut path = self.base_path.clone();
        let mut segments = relative.split('\\').filter(|s| !s.is_empty()).peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_some() {
                path.push(segment);
            } else {
                path.push(format!("{}.{}", segment, SOURCE_EXTENSION));
            }
        }
        path
    }

    /// Whether the file for `raw` is already on disk
    pub fn exists(&self, raw: &str) -> bool {
        self.path_for(&self.qualify(raw)).exists()
    }
}

/// Namespace part of a class name: `App\Models\Blog\Post` -> `App\Models\Blog`
pub fn namespace_of(name: &str) -> String {
    match name.rfind('\\') {
        Some(idx) => name[..idx].trim_matches('\\').to_string(),
        None => String::new(),
    }
}

/// Last segment of a class name: `App\Models\Blog\Post` -> `Post`
pub fn class_basename(name: &str) -> &str {
    name.rsplit('\\').next().unwrap_or(name)
}

/// `UserProfile` -> `user_profile`.
///
/// Each run of capitals becomes one `_`-prefixed lowercase run, repeated
/// underscores collapse and leading/trailing underscores are dropped.
pub fn to_underscore(s: &str) -> String {
    let marked = UPPERCASE_RUN.replace_all(s, |caps: &regex::Captures| {
        format!("_{}", caps[0].to_lowercase())
    });
    let collapsed = REPEATED_UNDERSCORES.replace_all(&marked, "_");
    collapsed.trim_matches('_').to_string()
}

/// Table backing a model class.
///
/// An explicit override is used verbatim. Otherwise the class basename gets a
/// plain `s` suffix and is converted with [`to_underscore`].
pub fn table_name(qualified: &str, table_override: Option<&str>) -> String {
    match table_override.map(str::trim).filter(|t| !t.is_empty()) {
        Some(table) => table.to_string(),
        None => to_underscore(&format!("{}s", class_basename(qualified))),
    }
}
