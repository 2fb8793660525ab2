pub mod csv_source;
pub mod etl;
pub mod sql;

pub use crate::domain::model::{
    DishRecord, GroupOrder, MenuGroups, NewDish, RestaurantGroup, RestaurantId, ScriptReport,
    SyncFailure, SyncReport,
};
pub use crate::domain::ports::{Pipeline, Storage, TableStore};
pub use crate::utils::error::Result;
