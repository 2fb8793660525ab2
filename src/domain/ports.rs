use crate::domain::model::{DishRecord, MenuGroups, NewDish, RestaurantId};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Output: Send;

    async fn extract(&self) -> Result<Vec<DishRecord>>;
    async fn transform(&self, records: Vec<DishRecord>) -> Result<MenuGroups>;
    async fn load(&self, groups: MenuGroups) -> Result<Self::Output>;
}

/// The remote `restaurants` / `dishes` tables.
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn find_restaurant_id(&self, name: &str) -> Result<Option<RestaurantId>>;
    async fn delete_dishes(&self, restaurant_id: &RestaurantId) -> Result<()>;
    async fn insert_dishes(&self, dishes: &[NewDish]) -> Result<()>;
}
