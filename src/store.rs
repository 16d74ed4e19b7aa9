use crate::errors::StoreError;
use crate::models::{ClientRecord, ReservationRecord, ReviewRecord, ServiceRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

pub const SCHEMA_VERSION: u32 = 1;

const COLLECTIONS: [&str; 4] = ["clients", "reservations", "services", "reviews"];

/// A named set of records keyed by an auto-assigned id. Every query is a
/// scan in ascending id order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection<T> {
    #[serde(default)]
    next_id: u64,
    records: BTreeMap<u64, T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: BTreeMap::new(),
        }
    }
}

impl<T> Collection<T> {
    pub fn insert(&mut self, record: T) -> u64 {
        let after_last = self.records.keys().next_back().map_or(1, |last| last + 1);
        let id = self.next_id.max(after_last);
        self.records.insert(id, record);
        self.next_id = id + 1;
        id
    }

    pub fn scan<'a>(&'a self, mut visit: impl FnMut(u64, &'a T)) {
        for (id, record) in &self.records {
            visit(*id, record);
        }
    }

    pub fn filter(&self, mut keep: impl FnMut(&T) -> bool) -> Vec<&T> {
        let mut matches = Vec::new();
        self.scan(|_, record| {
            if keep(record) {
                matches.push(record);
            }
        });
        matches
    }

    /// Removes the first record, in scan order, that satisfies `matches`.
    pub fn delete_first(&mut self, mut matches: impl FnMut(&T) -> bool) -> Option<(u64, T)> {
        let id = self
            .records
            .iter()
            .find(|(_, record)| matches(record))
            .map(|(id, _)| *id)?;
        self.records.remove(&id).map(|record| (id, record))
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        self.records.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &T)> {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalonData {
    #[serde(default = "schema_version")]
    pub version: u32,
    #[serde(default)]
    pub clients: Collection<ClientRecord>,
    #[serde(default)]
    pub reservations: Collection<ReservationRecord>,
    #[serde(default)]
    pub services: Collection<ServiceRecord>,
    #[serde(default)]
    pub reviews: Collection<ReviewRecord>,
}

impl Default for SalonData {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            clients: Collection::default(),
            reservations: Collection::default(),
            services: Collection::default(),
            reviews: Collection::default(),
        }
    }
}

fn schema_version() -> u32 {
    SCHEMA_VERSION
}

impl SalonData {
    /// Inserts the given names when the services collection is empty.
    pub fn seed_services_if_empty(&mut self, defaults: &[String]) -> bool {
        if !self.services.is_empty() || defaults.is_empty() {
            return false;
        }
        for name in defaults {
            self.services.insert(ServiceRecord { name: name.clone() });
        }
        true
    }

    /// Distinct service names in scan order, for the filter dropdown.
    pub fn service_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        self.services.scan(|_, service| {
            if seen.insert(service.name.as_str()) {
                names.push(service.name.clone());
            }
        });
        names
    }

    /// Deletes the first client whose phone matches exactly. Other clients
    /// sharing the number are left alone.
    pub fn delete_client_by_phone(&mut self, phone: &str) -> Option<(u64, ClientRecord)> {
        self.clients.delete_first(|client| client.phone == phone)
    }
}

/// Opens the store file. A missing file yields an empty store; missing
/// collections are created.
pub async fn open(path: &Path) -> Result<SalonData, StoreError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!("no store at {}, starting empty", path.display());
            return Ok(SalonData::default());
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let corrupt = |source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    };
    let raw: serde_json::Value = serde_json::from_slice(&bytes).map_err(corrupt)?;
    for name in COLLECTIONS {
        if raw.get(name).is_none() {
            info!(collection = name, "creating missing collection");
        }
    }
    let data: SalonData = serde_json::from_value(raw).map_err(corrupt)?;

    info!(
        clients = data.clients.len(),
        reservations = data.reservations.len(),
        services = data.services.len(),
        reviews = data.reviews.len(),
        "store opened"
    );
    Ok(data)
}

pub async fn persist(path: &Path, data: &SalonData) -> Result<(), StoreError> {
    let io = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(io)?;
    }
    let payload = serde_json::to_vec_pretty(data).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    if let Err(err) = fs::write(path, payload).await {
        error!("failed to write store file: {err}");
        return Err(io(err));
    }
    Ok(())
}
