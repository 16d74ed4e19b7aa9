use crate::config::Config;
use crate::errors::StoreError;
use crate::store::{self, SalonData};
use crate::sync::{SyncChannel, Topic};
use crate::timeline::TimelineRenderer;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// The storage session and everything each request shares. Opened once at
/// startup and never closed.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub data: Arc<Mutex<SalonData>>,
    pub sync: SyncChannel,
    pub upcoming: Arc<RwLock<Vec<String>>>,
    pub timeline: TimelineRenderer,
}

impl AppState {
    pub fn new(config: Config, data: SalonData) -> Self {
        Self {
            config: Arc::new(config),
            data: Arc::new(Mutex::new(data)),
            sync: SyncChannel::new(),
            upcoming: Arc::new(RwLock::new(Vec::new())),
            timeline: TimelineRenderer::default(),
        }
    }

    /// Applies `change` to a copy of the records and writes it to the store
    /// file. The copy replaces the live records only once it is on disk;
    /// then every open view is told to recompute.
    pub async fn write<T>(
        &self,
        topic: Topic,
        change: impl FnOnce(&mut SalonData) -> T,
    ) -> Result<T, StoreError> {
        let outcome = {
            let mut data = self.data.lock().await;
            let mut next = data.clone();
            let outcome = change(&mut next);
            store::persist(&self.config.data_path, &next).await?;
            *data = next;
            outcome
        };
        self.sync.publish(topic);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClientRecord;
    use std::path::PathBuf;

    fn temp_path(label: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("salon_state_{label}_{}_{nanos}", std::process::id()))
    }

    fn state_at(data_path: PathBuf) -> AppState {
        let config = Config {
            data_path,
            ..Config::default()
        };
        AppState::new(config, SalonData::default())
    }

    fn client(name: &str) -> ClientRecord {
        ClientRecord {
            name: name.to_string(),
            phone: "024".to_string(),
            ..ClientRecord::default()
        }
    }

    #[tokio::test]
    async fn failed_persist_leaves_records_untouched() {
        let blocker = temp_path("blocker");
        tokio::fs::write(&blocker, b"not a directory").await.unwrap();
        let state = state_at(blocker.join("salon.json"));
        let mut signals = state.sync.subscribe();

        let result = state
            .write(Topic::Dashboard, |data| data.clients.insert(client("Ama")))
            .await;

        assert!(result.is_err());
        assert!(state.data.lock().await.clients.is_empty());
        assert!(signals.try_recv().is_err());

        let _ = tokio::fs::remove_file(&blocker).await;
    }

    #[tokio::test]
    async fn successful_write_is_kept_and_announced() {
        let path = temp_path("ok").with_extension("json");
        let state = state_at(path.clone());
        let mut signals = state.sync.subscribe();

        let id = state
            .write(Topic::Dashboard, |data| data.clients.insert(client("Ama")))
            .await
            .unwrap();

        assert_eq!(id, 1);
        assert_eq!(state.data.lock().await.clients.len(), 1);
        assert_eq!(signals.try_recv().unwrap().topic, Topic::Dashboard);
        assert_eq!(store::open(&path).await.unwrap().clients.len(), 1);

        let _ = tokio::fs::remove_file(&path).await;
    }
}
