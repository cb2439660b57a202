//! Model generation pipeline: resolve, introspect, render, write

pub mod stub;
pub mod writer;

pub use stub::{parent_class, render_model, Placeholder, StubTemplate, StubValues};
pub use writer::SourceWriter;

use crate::config::GeneratorConfig;
use crate::db::{self, SchemaIntrospector};
use crate::error::Result;
use crate::utils::naming::{self, NameResolver};
use crate::utils::validators::{validate_class_name, validate_extend_class};
use std::path::PathBuf;

/// Label used in user-facing messages
pub const MODEL_KIND: &str = "AndphpModel";

/// What the user asked for
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    pub name: String,
    pub table: Option<String>,
    pub extend: Option<String>,
    pub force: bool,
}

/// Resolved target, known before the database is touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPlan {
    pub class: String,
    pub table: String,
    pub path: PathBuf,
    pub extend: Option<String>,
    pub force: bool,
}

#[derive(Debug, Clone)]
pub struct GeneratedModel {
    pub class: String,
    pub table: String,
    pub path: PathBuf,
    pub source: String,
}

pub struct ModelGenerator {
    resolver: NameResolver,
    stub: StubTemplate,
}

impl ModelGenerator {
    pub fn new(resolver: NameResolver, stub: StubTemplate) -> Self {
        Self { resolver, stub }
    }

    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let stub = StubTemplate::resolve(config.stub_path.as_deref())?;
        Ok(Self::new(NameResolver::from_config(config), stub))
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    /// Resolve names and paths and run the existence guard
    pub fn plan(&self, request: &ModelRequest) -> Result<ModelPlan> {
        let name = request.name.trim();
        validate_class_name(name)?;

        let extend = request
            .extend
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);
        if let Some(extend) = &extend {
            validate_extend_class(extend)?;
        }

        let class = self.resolver.qualify(name);
        let path = self.resolver.path_for(&class);
        let table = naming::table_name(&class, request.table.as_deref());

        log::debug!("Resolved {} -> {} ({})", name, class, path.display());

        SourceWriter::new(MODEL_KIND, request.force).ensure_writable(&path)?;

        Ok(ModelPlan {
            class,
            table,
            path,
            extend,
            force: request.force,
        })
    }

    /// Read the catalog, render the stub and write the model file
    pub async fn generate(
        &self,
        plan: &ModelPlan,
        introspector: &dyn SchemaIntrospector,
        database: &str,
    ) -> Result<GeneratedModel> {
        let summary = db::summarize(introspector, database, &plan.table).await?;

        let source = render_model(
            &self.stub,
            &self.resolver,
            &plan.class,
            &plan.table,
            &summary,
            plan.extend.as_deref(),
        );

        SourceWriter::new(MODEL_KIND, plan.force).write(&plan.path, &source)?;

        Ok(GeneratedModel {
            class: plan.class.clone(),
            table: plan.table.clone(),
            path: plan.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    fn generator(base: &std::path::Path) -> ModelGenerator {
        ModelGenerator::new(NameResolver::new("App", base), StubTemplate::embedded())
    }

    #[test]
    fn test_plan_resolves_everything() {
        let tmp = TempDir::new().unwrap();
        let plan = generator(tmp.path())
            .plan(&ModelRequest {
                name: " Blog/Post ".to_string(),
                ..ModelRequest::default()
            })
            .unwrap();

        assert_eq!(plan.class, "App\\Models\\Blog\\Post");
        assert_eq!(plan.table, "posts");
        assert_eq!(plan.path, tmp.path().join("Models").join("Blog").join("Post.php"));
        assert_eq!(plan.extend, None);
    }

    #[test]
    fn test_plan_uses_table_override() {
        let tmp = TempDir::new().unwrap();
        let plan = generator(tmp.path())
            .plan(&ModelRequest {
                name: "User".to_string(),
                table: Some("custom_tbl".to_string()),
                extend: Some("  ".to_string()),
                ..ModelRequest::default()
            })
            .unwrap();

        assert_eq!(plan.table, "custom_tbl");
        assert_eq!(plan.extend, None);
    }

    #[test]
    fn test_plan_rejects_empty_name() {
        let tmp = TempDir::new().unwrap();
        let err = generator(tmp.path())
            .plan(&ModelRequest {
                name: "   ".to_string(),
                ..ModelRequest::default()
            })
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_plan_guards_existing_file() {
        let tmp = TempDir::new().unwrap();
        let models = tmp.path().join("Models");
        fs::create_dir_all(&models).unwrap();
        fs::write(models.join("User.php"), "<?php // hand written").unwrap();

        let generator = generator(tmp.path());
        let mut request = ModelRequest {
            name: "User".to_string(),
            ..ModelRequest::default()
        };
        assert!(generator.plan(&request).unwrap_err().is_preexisting_target());
        assert!(generator.resolver().exists("User"));

        request.force = true;
        assert!(generator.plan(&request).is_ok());
    }
}
