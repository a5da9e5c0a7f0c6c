use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::KeyValueStore;
use crate::models::{Record, RecordList};
use crate::store::StoreError;

/// Default storage key for the record collection
pub const DEFAULT_RECORDS_KEY: &str = "alunos";

/// What to do when the stored blob cannot be parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptPolicy {
    /// Copy the blob to a free `<key>.corrupted[.N]` key, start empty, report it
    #[default]
    Backup,
    /// Refuse to start
    Fail,
}

/// Result of loading the collection
#[derive(Debug)]
pub struct Loaded {
    pub records: RecordList,
    /// Set when a corrupt blob was backed up; holds the backup key
    pub recovered_to: Option<String>,
}

/// Reads and writes the record collection as one JSON blob
pub struct RecordRepository<S> {
    kv: S,
    key: String,
    on_corrupt: CorruptPolicy,
}

impl<S: KeyValueStore> RecordRepository<S> {
    pub fn new(kv: S, key: impl Into<String>, on_corrupt: CorruptPolicy) -> Self {
        RecordRepository {
            kv,
            key: key.into(),
            on_corrupt,
        }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Load the collection; an absent key yields an empty collection
    pub fn load(&mut self) -> Result<Loaded, StoreError> {
        let blob = self
            .kv
            .get(&self.key)
            .map_err(StoreError::Persistence)?;

        let Some(blob) = blob else {
            log::info!(
                "No records under key {:?} in {}, starting empty",
                self.key,
                self.kv.describe()
            );
            return Ok(Loaded {
                records: RecordList::new(),
                recovered_to: None,
            });
        };

        let parsed = serde_json::from_str::<Vec<Record>>(&blob)
            .map_err(|e| e.to_string())
            .and_then(|records| {
                RecordList::from_records(records).map_err(|id| format!("duplicate record id {}", id))
            });

        let reason = match parsed {
            Ok(records) => {
                log::info!(
                    "Loaded {} records from key {:?} in {}",
                    records.len(),
                    self.key,
                    self.kv.describe()
                );
                return Ok(Loaded {
                    records,
                    recovered_to: None,
                });
            }
            Err(reason) => reason,
        };

        match self.on_corrupt {
            CorruptPolicy::Fail => {
                log::error!("Stored records under {:?} are corrupt: {}", self.key, reason);
                Err(StoreError::Corrupt {
                    key: self.key.clone(),
                    reason,
                })
            }
            CorruptPolicy::Backup => {
                let backup_key = self.back_up(&blob)?;
                log::warn!(
                    "Stored records under {:?} are corrupt, backed up to {:?}: {}",
                    self.key,
                    backup_key,
                    reason
                );
                Ok(Loaded {
                    records: RecordList::new(),
                    recovered_to: Some(backup_key),
                })
            }
        }
    }

    /// Copy `blob` to the first free `<key>.corrupted[.N]` slot.
    /// A slot already holding the same bytes is reused without writing.
    fn back_up(&mut self, blob: &str) -> Result<String, StoreError> {
        let base = format!("{}.corrupted", self.key);
        for n in 0..u32::MAX {
            let candidate = if n == 0 {
                base.clone()
            } else {
                format!("{}.{}", base, n)
            };
            match self.kv.get(&candidate).map_err(StoreError::Persistence)? {
                Some(existing) if existing == blob => return Ok(candidate),
                Some(_) => continue,
                None => {
                    self.kv
                        .set(&candidate, blob)
                        .with_context(|| {
                            format!("Failed to back up corrupt blob to {:?}", candidate)
                        })
                        .map_err(StoreError::Persistence)?;
                    return Ok(candidate);
                }
            }
        }
        Err(StoreError::Persistence(anyhow::anyhow!(
            "No free backup slot for {:?}",
            self.key
        )))
    }

    /// Overwrite the stored blob with the full collection
    pub fn save(&mut self, records: &RecordList) -> Result<(), StoreError> {
        let json = serialize_records(records).map_err(StoreError::Persistence)?;
        self.kv
            .set(&self.key, &json)
            .map_err(StoreError::Persistence)?;
        log::debug!("Saved {} records under key {:?}", records.len(), self.key);
        Ok(())
    }

    /// Raw stored blob, if any
    pub fn raw(&self) -> anyhow::Result<Option<String>> {
        self.kv.get(&self.key)
    }
}

/// Serialize the collection in order as a JSON array
pub fn serialize_records(records: &RecordList) -> anyhow::Result<String> {
    serde_json::to_string(records.records()).context("Failed to serialize records")
}
