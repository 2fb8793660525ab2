use crate::core::{NewDish, RestaurantId, SyncReport, TableStore};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fmt::Write;
use tokio::sync::Mutex;

/// A [`TableStore`] that makes no remote calls and records the insert batches it would send.
///
/// Every restaurant is treated as known; its name stands in for the id.
#[derive(Debug, Default)]
pub struct DryRunStore {
    batches: Mutex<Vec<(String, usize)>>,
}

impl DryRunStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert batches recorded so far, as `(restaurant, dishes in batch)`.
    pub async fn batches(&self) -> Vec<(String, usize)> {
        self.batches.lock().await.clone()
    }

    pub async fn render_plan(&self, report: &SyncReport) -> String {
        let batches = self.batches.lock().await;
        let mut out = String::new();

        let _ = writeln!(out, "📋 Would sync {} restaurants:", report.restaurants);
        for (restaurant, count) in &report.synced {
            let planned = batches.iter().filter(|(name, _)| name == restaurant).count();
            let _ = writeln!(
                out,
                "  {}: {} dishes in {} insert batch(es)",
                restaurant, count, planned
            );
        }
        let _ = writeln!(
            out,
            "Total: {} dishes across {} restaurants",
            report.total_synced, report.restaurants
        );
        out
    }
}

#[async_trait]
impl TableStore for DryRunStore {
    async fn find_restaurant_id(&self, name: &str) -> Result<Option<RestaurantId>> {
        Ok(Some(RestaurantId(serde_json::Value::String(name.to_string()))))
    }

    async fn delete_dishes(&self, restaurant_id: &RestaurantId) -> Result<()> {
        tracing::debug!("🔍 Would delete dishes of {}", restaurant_id);
        Ok(())
    }

    async fn insert_dishes(&self, dishes: &[NewDish]) -> Result<()> {
        let Some(first) = dishes.first() else {
            return Ok(());
        };
        let restaurant = first.restaurant_id.to_string();
        tracing::debug!("🔍 Would insert {} dishes for {}", dishes.len(), restaurant);
        self.batches.lock().await.push((restaurant, dishes.len()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::etl::EtlEngine;
    use crate::core::csv_source::CsvSource;
    use crate::SyncPipeline;
    use std::io::Write as _;

    #[tokio::test]
    async fn test_dry_run_goes_through_sync_pipeline() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"restaurant_name,dish_name,category,price\n\
              Atlas,Harira,soup,6\n\
              Mio,Ramen,noodles,12\n\
              Atlas,Tagine,mains,18.5\n\
              Atlas,Tea,drinks,3\n",
        )
        .unwrap();

        let pipeline = SyncPipeline::new(CsvSource::new(file.path()), DryRunStore::new())
            .with_batch_size(2);
        let engine = EtlEngine::new(pipeline);
        let report = engine.run().await.unwrap();

        let store = engine.pipeline().store();
        assert_eq!(
            store.batches().await,
            vec![
                ("Atlas".to_string(), 2),
                ("Atlas".to_string(), 1),
                ("Mio".to_string(), 1),
            ]
        );
        assert_eq!(
            store.render_plan(&report).await,
            "📋 Would sync 2 restaurants:\n\
             \x20 Atlas: 3 dishes in 2 insert batch(es)\n\
             \x20 Mio: 1 dishes in 1 insert batch(es)\n\
             Total: 4 dishes across 2 restaurants\n"
        );
    }

    #[tokio::test]
    async fn test_bad_price_is_reported_in_dry_run() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"restaurant_name,dish_name,category,price\n\
              Atlas,Harira,soup,free\n\
              Mio,Ramen,noodles,12\n",
        )
        .unwrap();

        let engine = EtlEngine::new(SyncPipeline::new(
            CsvSource::new(file.path()),
            DryRunStore::new(),
        ));
        let report = engine.run().await.unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].restaurant_name, "Atlas");
        assert_eq!(
            engine.pipeline().store().batches().await,
            vec![("Mio".to_string(), 1)]
        );
    }
}
