use crate::config::GeneratorConfig;
use crate::db;
use crate::generator::{ModelGenerator, ModelRequest, MODEL_KIND};
use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

/// Create a new model class from a database table
#[derive(Debug, Clone, Args)]
pub struct ModelCommand {
    /// The name of the model, e.g. `User` or `Blog/Post`
    pub name: String,

    /// Table to read columns from (defaults to the pluralized class name)
    #[arg(long)]
    pub table: Option<String>,

    /// Parent class to extend
    #[arg(long)]
    pub extend: Option<String>,

    /// Named connection to use (defaults to the configured default)
    #[arg(long)]
    pub connection: Option<String>,
}

impl ModelCommand {
    fn request(&self, force: bool) -> ModelRequest {
        ModelRequest {
            name: self.name.clone(),
            table: self.table.clone(),
            extend: self.extend.clone(),
            force,
        }
    }

    pub async fn execute(self, project_path: &Path, force: bool) -> Result<()> {
        let config = GeneratorConfig::load(project_path)?;
        let generator = ModelGenerator::from_config(&config)?;

        // The guard runs before any database work
        let plan = generator.plan(&self.request(force))?;

        let (connection_name, connection) = config.connection(self.connection.as_deref())?;
        log::debug!("Using database connection '{}'", connection_name);

        let introspector = db::create_introspector(connection)
            .await
            .with_context(|| format!("Could not open connection '{}'", connection_name))?;

        let database = match &connection.database {
            Some(database) => database.clone(),
            None => introspector.database_name().await?,
        };

        let model = generator
            .generate(&plan, introspector.as_ref(), &database)
            .await
            .with_context(|| format!("Failed to generate {}", plan.class))?;

        println!("✅ {} created successfully.", MODEL_KIND);
        println!("📄 {} -> {}", model.class, model.path.display());
        println!("🗃️  Table: {}.{}", database, model.table);
        Ok(())
    }
}
