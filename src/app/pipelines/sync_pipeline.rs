use crate::adapters::storage::LocalStorage;
use crate::core::csv_source::CsvSource;
use crate::core::{
    DishRecord, GroupOrder, MenuGroups, NewDish, Pipeline, RestaurantGroup, RestaurantId,
    Storage, SyncFailure, SyncReport, TableStore,
};
use crate::utils::error::{EtlError, Result};

pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Replaces each restaurant's dishes in the remote store with the rows from a menu file.
pub struct SyncPipeline<T: TableStore, R: Storage = LocalStorage> {
    source: CsvSource<R>,
    store: T,
    batch_size: usize,
}

impl<T: TableStore, R: Storage> SyncPipeline<T, R> {
    pub fn new(source: CsvSource<R>, store: T) -> Self {
        Self {
            source,
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn store(&self) -> &T {
        &self.store
    }

    fn to_new_dishes(restaurant_id: &RestaurantId, group: &RestaurantGroup) -> Result<Vec<NewDish>> {
        group
            .dishes
            .iter()
            .map(|dish| -> Result<NewDish> {
                let invalid = || EtlError::ValidationError {
                    message: format!(
                        "invalid price '{}' for dish '{}'",
                        dish.price, dish.dish_name
                    ),
                };
                let price = dish.price.trim().parse::<f64>().map_err(|_| invalid())?;
                // NaN and infinities parse but serialize as JSON null.
                if !price.is_finite() {
                    return Err(invalid());
                }
                Ok(NewDish {
                    restaurant_id: restaurant_id.clone(),
                    name: dish.dish_name.clone(),
                    category: dish.category.clone(),
                    price,
                })
            })
            .collect()
    }

    /// Returns the number of dishes written for the group.
    async fn sync_group(&self, group: &RestaurantGroup) -> Result<usize> {
        let restaurant_id = self
            .store
            .find_restaurant_id(&group.restaurant_name)
            .await?
            .ok_or_else(|| EtlError::RestaurantNotFound {
                name: group.restaurant_name.clone(),
            })?;

        // Prices are checked before anything is deleted.
        let rows = Self::to_new_dishes(&restaurant_id, group)?;

        self.store.delete_dishes(&restaurant_id).await?;

        for batch in rows.chunks(self.batch_size) {
            self.store.insert_dishes(batch).await?;
        }

        Ok(rows.len())
    }
}

#[async_trait::async_trait]
impl<T: TableStore, R: Storage> Pipeline for SyncPipeline<T, R> {
    type Output = SyncReport;

    async fn extract(&self) -> Result<Vec<DishRecord>> {
        self.source.load().await
    }

    async fn transform(&self, records: Vec<DishRecord>) -> Result<MenuGroups> {
        Ok(MenuGroups::group(records, GroupOrder::FirstSeen))
    }

    async fn load(&self, groups: MenuGroups) -> Result<SyncReport> {
        let mut report = SyncReport {
            restaurants: groups.len(),
            ..SyncReport::default()
        };

        for group in &groups {
            tracing::info!(
                "⏳ Syncing {} ({} dishes)...",
                group.restaurant_name,
                group.dishes.len()
            );

            match self.sync_group(group).await {
                Ok(count) => {
                    tracing::info!("✅ Synced {}!", group.restaurant_name);
                    report.total_synced += count;
                    report
                        .synced
                        .push((group.restaurant_name.clone(), count));
                }
                Err(e) => {
                    tracing::error!("❌ {}: {}", group.restaurant_name, e.user_friendly_message());
                    report.failures.push(SyncFailure {
                        restaurant_name: group.restaurant_name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}
