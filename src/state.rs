use crate::errors::AppError;
use crate::models::AppData;
use crate::storage::persist_data;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Runs `f` against the locked document and writes it back when `f` succeeds.
    pub async fn mutate<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut AppData) -> Result<T, AppError>,
    {
        let mut data = self.data.lock().await;
        let out = f(&mut data)?;
        persist_data(&self.data_path, &data).await?;
        Ok(out)
    }

    /// [`mutate`](Self::mutate) for closures with their own rejection type.
    /// Nothing is written when `f` fails.
    pub async fn mutate_with<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<AppError>,
        F: FnOnce(&mut AppData) -> Result<T, E>,
    {
        let mut data = self.data.lock().await;
        let out = f(&mut data)?;
        persist_data(&self.data_path, &data).await?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_data;
    use chrono::Utc;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("downtown_guide_state_{}_{name}.json", std::process::id()));
        path
    }

    #[tokio::test]
    async fn failed_change_is_not_written() {
        let path = temp_path("rejected");
        let _ = tokio::fs::remove_file(&path).await;
        let state = AppState::new(path.clone(), sample_data(Utc::now()));

        let rejected: Result<(), AppError> = state
            .mutate_with(|data| {
                if data.coupons.is_empty() {
                    return Ok(());
                }
                Err(AppError::unprocessable("no"))
            })
            .await;
        assert!(rejected.is_err());
        assert!(!path.exists());

        state
            .mutate(|data| {
                data.news.clear();
                Ok(())
            })
            .await
            .unwrap();
        assert!(path.exists());
        let _ = tokio::fs::remove_file(&path).await;
    }
}
