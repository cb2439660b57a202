//! Model stub loading and placeholder substitution

use crate::db::SchemaSummary;
use crate::error::{Error, Result};
use crate::utils::naming::{class_basename, namespace_of, NameResolver};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};

/// Stub shipped with the binary
pub const MODEL_STUB: &str = include_str!("../../stubs/model.plain.stub");

/// Suffix appended to the imported parent class
const PARENT_CLASS_SUFFIX: &str = "Model";

/// The closed set of tokens a stub may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Namespace,
    RootNamespace,
    Class,
    Table,
    Comments,
    Fields,
    UseNamespace,
    ExtendClass,
}

impl Placeholder {
    pub const ALL: [Placeholder; 8] = [
        Placeholder::Namespace,
        Placeholder::RootNamespace,
        Placeholder::Class,
        Placeholder::Table,
        Placeholder::Comments,
        Placeholder::Fields,
        Placeholder::UseNamespace,
        Placeholder::ExtendClass,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Namespace => "DummyNamespace",
            Placeholder::RootNamespace => "DummyRootNamespace",
            Placeholder::Class => "DummyClass",
            Placeholder::Table => "DummyTable",
            Placeholder::Comments => "DummyComments",
            Placeholder::Fields => "DummyFields",
            Placeholder::UseNamespace => "DummyUseNamespace",
            Placeholder::ExtendClass => "DummyExtendClass",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.token() == token)
    }
}

// No token is a prefix of another, so alternation order does not matter.
static PLACEHOLDER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let alternation = Placeholder::ALL
        .iter()
        .map(|p| regex::escape(p.token()))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).unwrap()
});

/// Values substituted for each placeholder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StubValues {
    pub namespace: String,
    pub root_namespace: String,
    pub class: String,
    pub table: String,
    pub comments: String,
    pub fields: String,
    pub use_namespace: String,
    pub extend_class: String,
}

impl StubValues {
    pub fn get(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::Namespace => &self.namespace,
            Placeholder::RootNamespace => &self.root_namespace,
            Placeholder::Class => &self.class,
            Placeholder::Table => &self.table,
            Placeholder::Comments => &self.comments,
            Placeholder::Fields => &self.fields,
            Placeholder::UseNamespace => &self.use_namespace,
            Placeholder::ExtendClass => &self.extend_class,
        }
    }
}

/// Immutable stub text
#[derive(Debug, Clone)]
pub struct StubTemplate {
    text: String,
    source: Option<PathBuf>,
}

impl StubTemplate {
    pub fn embedded() -> Self {
        Self {
            text: MODEL_STUB.to_string(),
            source: None,
        }
    }

    pub fn from_text<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            source: None,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::TemplateMissing {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Loaded stub from {}", path.display());
        Ok(Self {
            text,
            source: Some(path.to_path_buf()),
        })
    }

    /// Custom stub when a path is configured, the embedded one otherwise
    pub fn resolve(stub_path: Option<&Path>) -> Result<Self> {
        match stub_path {
            Some(path) => Self::load(path),
            None => Ok(Self::embedded()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Replace every placeholder in one pass; substituted text is not rescanned
    pub fn render(&self, values: &StubValues) -> String {
        PLACEHOLDER_PATTERN
            .replace_all(&self.text, |caps: &Captures| {
                Placeholder::from_token(&caps[0])
                    .map(|p| values.get(p).to_string())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// Import line and local name for the class a model extends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentClass {
    pub import: String,
    pub class: String,
}

/// Work out the parent class from the `--extend` argument.
///
/// Two or more `\` segments mean the name is already fully qualified and no
/// import is emitted. Anything else is qualified under the models namespace
/// and imported with the `Model` suffix. The local name is always the last
/// segment.
pub fn parent_class(resolver: &NameResolver, extend: &str) -> ParentClass {
    let class = extend
        .rsplit(['\\', '/'])
        .next()
        .unwrap_or_default()
        .to_string();

    let import = if extend.split('\\').count() >= 2 {
        String::new()
    } else {
        format!("use {}{};", resolver.qualify(extend), PARENT_CLASS_SUFFIX)
    };

    ParentClass { import, class }
}

/// Drop the import of the base model from the class's own namespace
pub fn remove_own_namespace_import(source: &str, namespace: &str) -> String {
    source.replace(
        &format!("use {}\\{};\n", namespace, PARENT_CLASS_SUFFIX),
        "",
    )
}

/// Render the model source for a fully-qualified class name
pub fn render_model(
    stub: &StubTemplate,
    resolver: &NameResolver,
    qualified: &str,
    table: &str,
    summary: &SchemaSummary,
    extend: Option<&str>,
) -> String {
    let namespace = namespace_of(qualified);
    let parent = parent_class(resolver, extend.unwrap_or_default());

    let values = StubValues {
        namespace: namespace.clone(),
        root_namespace: resolver.root_namespace(),
        class: class_basename(qualified).to_string(),
        table: table.to_string(),
        comments: summary.comments.clone(),
        fields: summary.fields.clone(),
        use_namespace: parent.import,
        extend_class: parent.class,
    };

    remove_own_namespace_import(&stub.render(&values), &namespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> NameResolver {
        NameResolver::new("App", "/srv/app")
    }

    #[test]
    fn test_embedded_stub_has_every_placeholder() {
        let stub = StubTemplate::embedded();
        for placeholder in Placeholder::ALL {
            assert!(
                stub.text().contains(placeholder.token()),
                "missing {}",
                placeholder.token()
            );
        }
    }

    #[test]
    fn test_single_pass_does_not_rescan_values() {
        let stub = StubTemplate::from_text("class DummyClass { /* DummyComments */ }");
        let values = StubValues {
            class: "Post".to_string(),
            comments: "DummyClass stays literal".to_string(),
            ..StubValues::default()
        };

        assert_eq!(
            stub.render(&values),
            "class Post { /* DummyClass stays literal */ }"
        );
    }

    #[test]
    fn test_adjacent_tokens() {
        let stub = StubTemplate::from_text("DummyRootNamespaceModels|DummyExtendClassModel");
        let values = StubValues {
            root_namespace: "App\\".to_string(),
            extend_class: "Base".to_string(),
            ..StubValues::default()
        };
        assert_eq!(stub.render(&values), "App\\Models|BaseModel");
    }

    #[test]
    fn test_parent_class_single_segment() {
        let parent = parent_class(&resolver(), "Base");
        assert_eq!(parent.import, "use App\\Models\\BaseModel;");
        assert_eq!(parent.class, "Base");

        let parent = parent_class(&resolver(), "Blog/Base");
        assert_eq!(parent.import, "use App\\Models\\Blog\\BaseModel;");
        assert_eq!(parent.class, "Base");
    }

    #[test]
    fn test_parent_class_qualified() {
        let parent = parent_class(&resolver(), "Vendor\\Base");
        assert_eq!(parent.import, "");
        assert_eq!(parent.class, "Base");
    }

    #[test]
    fn test_parent_class_absent() {
        let parent = parent_class(&resolver(), "");
        assert_eq!(parent.import, "use App\\Models\\Model;");
        assert_eq!(parent.class, "");
    }

    #[test]
    fn test_remove_own_namespace_import() {
        let source = "namespace App\\Models;\n\nuse App\\Models\\Model;\n\nclass User extends Model {}";
        assert_eq!(
            remove_own_namespace_import(source, "App\\Models"),
            "namespace App\\Models;\n\n\nclass User extends Model {}"
        );
        // imports from other namespaces stay
        assert_eq!(remove_own_namespace_import(source, "App\\Models\\Blog"), source);
    }

    #[test]
    fn test_render_model_in_models_namespace() {
        let summary = SchemaSummary {
            comments: " * @property string name full name".to_string(),
            fields: "'name'".to_string(),
        };
        let source = render_model(
            &StubTemplate::embedded(),
            &resolver(),
            "App\\Models\\User",
            "users",
            &summary,
            None,
        );

        assert!(source.contains("namespace App\\Models;"));
        assert!(!source.contains("use App\\Models\\Model;"));
        assert!(source.contains("class User extends Model"));
        assert!(source.contains("protected $table = 'users';"));
        assert!(source.contains("protected $fillable = ['name'];"));
        assert!(source.contains(" * @property string name full name\n"));
        assert!(source.contains("@package App\\Models"));
        assert!(!source.contains("Dummy"));
    }

    #[test]
    fn test_render_model_in_sub_namespace_keeps_import() {
        let source = render_model(
            &StubTemplate::embedded(),
            &resolver(),
            "App\\Models\\Blog\\Post",
            "posts",
            &SchemaSummary::default(),
            None,
        );

        assert!(source.contains("namespace App\\Models\\Blog;"));
        assert!(source.contains("use App\\Models\\Model;\n"));
        assert!(source.contains("protected $fillable = [];"));
    }

    #[test]
    fn test_load_missing_stub() {
        let err = StubTemplate::load("/definitely/not/here/model.stub").unwrap_err();
        assert!(matches!(err, Error::TemplateMissing { .. }));
    }
}
