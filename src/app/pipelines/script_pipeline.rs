use crate::adapters::storage::LocalStorage;
use crate::core::csv_source::CsvSource;
use crate::core::sql::{render_script, ScriptFlavor};
use crate::core::{DishRecord, MenuGroups, Pipeline, ScriptReport, Storage};
use crate::utils::error::Result;

/// Renders a SQL script from a menu file and hands it to a storage backend.
pub struct ScriptPipeline<S: Storage, R: Storage = LocalStorage> {
    pub(crate) source: CsvSource<R>,
    pub(crate) flavor: ScriptFlavor,
    pub(crate) storage: S,
    pub(crate) output_name: String,
    pub(crate) destination: String,
}

impl<S: Storage, R: Storage> ScriptPipeline<S, R> {
    /// `destination` is how the written script is reported back, e.g. the full file path.
    pub fn new(
        source: CsvSource<R>,
        flavor: ScriptFlavor,
        storage: S,
        output_name: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            source,
            flavor,
            storage,
            output_name: output_name.into(),
            destination: destination.into(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, R: Storage> Pipeline for ScriptPipeline<S, R> {
    type Output = ScriptReport;

    async fn extract(&self) -> Result<Vec<DishRecord>> {
        self.source.load().await
    }

    async fn transform(&self, records: Vec<DishRecord>) -> Result<MenuGroups> {
        Ok(MenuGroups::group(records, self.flavor.group_order()))
    }

    async fn load(&self, groups: MenuGroups) -> Result<ScriptReport> {
        let script = render_script(&self.flavor, &groups);
        tracing::debug!(
            "Writing {} bytes of SQL to {}",
            script.len(),
            self.destination
        );
        self.storage
            .write_file(&self.output_name, script.as_bytes())
            .await?;

        Ok(ScriptReport {
            destination: self.destination.clone(),
            restaurant_counts: groups.restaurant_counts(),
            total_dishes: groups.total_dishes(),
        })
    }
}
