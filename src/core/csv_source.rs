use crate::adapters::storage::LocalStorage;
use crate::domain::model::DishRecord;
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// A delimited menu file with `restaurant_name,dish_name,category,price` header columns.
///
/// The bytes are fetched through a [`Storage`] backend; [`CsvSource::new`] reads from the
/// local filesystem.
#[derive(Debug, Clone)]
pub struct CsvSource<R: Storage = LocalStorage> {
    path: PathBuf,
    storage: R,
    delimiter: u8,
    normalize_categories: bool,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_storage(path, LocalStorage::new(".".to_string()))
    }
}

impl<R: Storage> CsvSource<R> {
    pub fn with_storage(path: impl Into<PathBuf>, storage: R) -> Self {
        Self {
            path: path.into(),
            storage,
            delimiter: b',',
            normalize_categories: false,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Replace `_` with a space in every category.
    pub fn with_normalized_categories(mut self, normalize: bool) -> Self {
        self.normalize_categories = normalize;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used in generated script headers.
    pub fn source_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub async fn load(&self) -> Result<Vec<DishRecord>> {
        let path = self.path.to_string_lossy();
        tracing::debug!("Reading dishes from {}", path);
        let data = self.storage.read_file(&path).await?;
        read_dishes(data.as_slice(), self.delimiter, self.normalize_categories)
    }
}

pub fn read_dishes<R: Read>(
    reader: R,
    delimiter: u8,
    normalize_categories: bool,
) -> Result<Vec<DishRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut dishes = Vec::new();

    for result in rdr.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let mut dish: DishRecord = row.deserialize(Some(&headers))?;

        if dish.restaurant_name.trim().is_empty() {
            return Err(EtlError::ValidationError {
                message: format!("line {}: restaurant_name is empty", line),
            });
        }

        if normalize_categories {
            dish.category = dish.category.replace('_', " ");
        }

        dishes.push(dish);
    }

    Ok(dishes)
}
