use crate::error::StoreError;
use crate::model::{Dataset, DatasetSummary, NewDataset};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// The `DatasetRepository` keeps uploaded datasets for the lifetime of the
/// process and hands out read-only snapshots.
///
/// Cloning is cheap: every clone shares the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct DatasetRepository {
    datasets: Arc<RwLock<HashMap<Uuid, Arc<Dataset>>>>,
}

impl DatasetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates an upload and stores it under a fresh id.
    pub async fn save_dataset(&self, upload: NewDataset) -> Result<DatasetSummary, StoreError> {
        let dataset = Dataset::from_upload(upload)?;
        let summary = dataset.summary();
        tracing::info!(
            dataset_id = %summary.id,
            name = %summary.original_name,
            rows = summary.rows,
            cols = summary.cols,
            "Dataset stored."
        );
        self.datasets.write().await.insert(dataset.id, Arc::new(dataset));
        Ok(summary)
    }

    /// All datasets, newest first.
    pub async fn list_datasets(&self) -> Vec<DatasetSummary> {
        let datasets = self.datasets.read().await;
        let mut summaries: Vec<DatasetSummary> = datasets.values().map(|d| d.summary()).collect();
        summaries.sort_by(|a, b| b.upload_time.cmp(&a.upload_time).then_with(|| a.id.cmp(&b.id)));
        summaries
    }

    pub async fn get_dataset(&self, id: Uuid) -> Result<Arc<Dataset>, StoreError> {
        self.datasets
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    pub async fn delete_dataset(&self, id: Uuid) -> Result<(), StoreError> {
        match self.datasets.write().await.remove(&id) {
            Some(_) => {
                tracing::info!(dataset_id = %id, "Dataset deleted.");
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn upload(name: &str) -> NewDataset {
        NewDataset {
            name: name.to_string(),
            columns: vec!["year".into(), "units".into()],
            rows: vec![vec![json!(2021), json!(4)], vec![json!(2022), json!(9)]],
        }
    }

    #[tokio::test]
    async fn save_get_and_delete() {
        let repo = DatasetRepository::new();
        let summary = repo.save_dataset(upload("units.csv")).await.unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.cols, 2);

        let dataset = repo.get_dataset(summary.id).await.unwrap();
        assert_eq!(dataset.name, "units.csv");

        repo.delete_dataset(summary.id).await.unwrap();
        assert_eq!(repo.get_dataset(summary.id).await.unwrap_err(), StoreError::NotFound(summary.id));
        assert!(matches!(repo.delete_dataset(summary.id).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let repo = DatasetRepository::new();
        let other = repo.clone();
        repo.save_dataset(upload("a.csv")).await.unwrap();
        other.save_dataset(upload("b.csv")).await.unwrap();
        assert_eq!(repo.list_datasets().await.len(), 2);
    }

    #[tokio::test]
    async fn invalid_uploads_are_not_stored() {
        let repo = DatasetRepository::new();
        let mut bad = upload("bad.csv");
        bad.columns.clear();
        assert!(repo.save_dataset(bad).await.is_err());
        assert!(repo.list_datasets().await.is_empty());
    }
}
