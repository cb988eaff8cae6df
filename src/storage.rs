use crate::errors::AppError;
use crate::models::AppData;
use crate::seed::sample_data;
use chrono::Utc;
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

/// Reads the data file. A missing file yields the sample directory when
/// `seed` is set; an unreadable or corrupt file yields an empty document.
pub async fn load_data(path: &Path, seed: bool) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            if seed {
                info!("no data file at {}, seeding sample data", path.display());
                sample_data(Utc::now())
            } else {
                AppData::default()
            }
        }
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("downtown_guide_{}_{name}.json", std::process::id()));
        path
    }

    #[tokio::test]
    async fn missing_file_seeds_or_stays_empty() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path).await;

        let seeded = load_data(&path, true).await;
        assert!(!seeded.businesses.is_empty());

        let empty = load_data(&path, false).await;
        assert!(empty.businesses.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_falls_back_to_empty() {
        let path = temp_path("corrupt");
        fs::write(&path, b"{ not json").await.unwrap();
        let data = load_data(&path, true).await;
        assert!(data.coupons.is_empty());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn persisted_data_reloads() {
        let path = temp_path("persist");
        let data = sample_data(Utc::now());
        persist_data(&path, &data).await.unwrap();
        let loaded = load_data(&path, false).await;
        assert_eq!(loaded.coupons, data.coupons);
        assert_eq!(loaded.loyalty_members, data.loyalty_members);
        let _ = fs::remove_file(&path).await;
    }
}
