//! Record collection state and the form state machine around it.
//!
//! All mutations happen in memory first. Submit and Delete write the full
//! collection back through the repository once they have committed; draft
//! edits and form open/close never touch storage.

use crate::models::{
    Draft, Field, FormMode, FormState, IdGenerator, Record, RecordList, ValidationError,
    validate_fields,
};
use crate::storage::{KeyValueStore, RecordRepository};

/// Errors from RecordStore operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("stored records under {key:?} are corrupt: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("generated id {0} is already in use, try again")]
    DuplicateId(u64),

    #[error("no form is open")]
    FormClosed,

    #[error("failed to persist records: {0:#}")]
    Persistence(anyhow::Error),
}

/// Outcome of a successful submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    Created(u64),
    Updated(u64),
    /// The record being edited no longer exists; nothing changed
    Missing(u64),
}

/// Owns the record collection, the draft and the form state
pub struct RecordStore<S = Box<dyn KeyValueStore>> {
    records: RecordList,
    draft: Draft,
    form: FormState,
    repo: RecordRepository<S>,
    ids: IdGenerator,
    initialized: bool,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Create an empty store; call `initialize` before use
    pub fn new(repo: RecordRepository<S>, ids: IdGenerator) -> Self {
        RecordStore {
            records: RecordList::new(),
            draft: Draft::default(),
            form: FormState::Hidden,
            repo,
            ids,
            initialized: false,
        }
    }

    /// Load the persisted collection. Only the first call reads storage.
    /// Returns the backup key when a corrupt blob was set aside.
    pub fn initialize(&mut self) -> Result<Option<String>, StoreError> {
        if self.initialized {
            return Ok(None);
        }

        let loaded = self.repo.load()?;
        self.records = loaded.records;
        if let Some(max) = self.records.max_id() {
            self.ids.observe(max);
        }
        self.initialized = true;
        Ok(loaded.recovered_to)
    }

    pub fn records(&self) -> &[Record] {
        self.records.records()
    }

    pub fn get(&self, id: u64) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn form(&self) -> FormState {
        self.form
    }

    pub fn repository(&self) -> &RecordRepository<S> {
        &self.repo
    }

    /// Set one draft field. No validation, no persistence.
    pub fn update_draft_field(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value.into());
    }

    /// Reset the draft and show the form in create mode
    pub fn open_create_form(&mut self) {
        self.draft.clear();
        self.form = FormState::Visible(FormMode::Create);
    }

    /// Copy a record into the draft and show the form in edit mode.
    /// Unknown ids are ignored; returns whether the form opened.
    pub fn open_edit_form(&mut self, id: u64) -> bool {
        let Some(record) = self.records.get(id) else {
            log::debug!("Edit requested for unknown record {}", id);
            return false;
        };

        self.draft = Draft {
            name: record.name.clone(),
            email: record.email.clone(),
            editing: Some(id),
        };
        self.form = FormState::Visible(FormMode::Edit(id));
        true
    }

    /// Hide the form without committing the draft
    pub fn close_form(&mut self) {
        self.form = FormState::Hidden;
    }

    /// Validate and commit the draft.
    ///
    /// On error nothing is mutated or written and the form stays open with
    /// the draft intact. On success the draft is cleared, the form hidden and
    /// the collection persisted.
    pub fn submit(&mut self) -> Result<Submitted, StoreError> {
        let FormState::Visible(mode) = self.form else {
            return Err(StoreError::FormClosed);
        };

        validate_fields(&self.draft.name, &self.draft.email)?;

        let name = self.draft.name.clone();
        let email = self.draft.email.clone();

        let outcome = match mode {
            FormMode::Create => {
                let id = self.ids.next_id();
                if !self.records.push(Record::new(id, name, email)) {
                    log::warn!("Generated id {} collides with an existing record", id);
                    return Err(StoreError::DuplicateId(id));
                }
                log::info!("Created record {}", id);
                Submitted::Created(id)
            }
            FormMode::Edit(id) => {
                if self.records.replace(id, name, email) {
                    log::info!("Updated record {}", id);
                    Submitted::Updated(id)
                } else {
                    log::debug!("Record {} vanished while editing", id);
                    Submitted::Missing(id)
                }
            }
        };

        self.draft.clear();
        self.form = FormState::Hidden;

        if !matches!(outcome, Submitted::Missing(_)) {
            self.persist()?;
        }
        Ok(outcome)
    }

    /// Remove a record by id and persist. Unknown ids are ignored.
    pub fn delete(&mut self, id: u64) -> Result<Option<Record>, StoreError> {
        let Some(removed) = self.records.remove(id) else {
            log::debug!("Delete requested for unknown record {}", id);
            return Ok(None);
        };

        log::info!("Deleted record {}", id);
        self.persist()?;
        Ok(Some(removed))
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        self.repo.save(&self.records).inspect_err(|e| {
            log::error!("{}", e);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IdStrategy;
    use crate::models::id::scripted_clock;
    use crate::storage::{CorruptPolicy, MemoryKeyValueStore};

    fn store_with(
        kv: MemoryKeyValueStore,
        strategy: IdStrategy,
        times: Vec<u64>,
    ) -> RecordStore<MemoryKeyValueStore> {
        let repo = RecordRepository::new(kv, "alunos", CorruptPolicy::Backup);
        let mut store = RecordStore::new(repo, IdGenerator::with_clock(strategy, scripted_clock(times)));
        store.initialize().unwrap();
        store
    }

    fn fresh(times: Vec<u64>) -> RecordStore<MemoryKeyValueStore> {
        store_with(MemoryKeyValueStore::new(), IdStrategy::Monotonic, times)
    }

    fn create(store: &mut RecordStore<MemoryKeyValueStore>, name: &str, email: &str) -> u64 {
        store.open_create_form();
        store.update_draft_field(Field::Name, name);
        store.update_draft_field(Field::Email, email);
        match store.submit().unwrap() {
            Submitted::Created(id) => id,
            other => panic!("expected create, got {:?}", other),
        }
    }

    fn persisted(store: &RecordStore<MemoryKeyValueStore>) -> Vec<Record> {
        let blob = store.repository().raw().unwrap().unwrap();
        serde_json::from_str(&blob).unwrap()
    }

    #[test]
    fn test_create_record() {
        let mut store = fresh(vec![1_700_000_000_001]);
        let id = create(&mut store, "2024.1", "coord@uni.edu");

        assert_eq!(id, 1_700_000_000_001);
        assert_eq!(store.records(), &[Record::new(id, "2024.1", "coord@uni.edu")]);
        assert_eq!(persisted(&store), store.records());
        assert_eq!(store.form(), FormState::Hidden);
        assert_eq!(store.draft(), &Draft::default());
    }

    #[test]
    fn test_edit_record() {
        let mut store = fresh(vec![1_000]);
        let id = create(&mut store, "2024.1", "coord@uni.edu");

        assert!(store.open_edit_form(id));
        assert_eq!(store.draft().name, "2024.1");
        assert_eq!(store.draft().editing, Some(id));
        assert_eq!(store.form(), FormState::Visible(FormMode::Edit(id)));

        store.update_draft_field(Field::Name, "2024.2");
        store.update_draft_field(Field::Email, "coord2@uni.edu");
        assert_eq!(store.submit().unwrap(), Submitted::Updated(id));

        assert_eq!(store.records(), &[Record::new(id, "2024.2", "coord2@uni.edu")]);
        assert_eq!(persisted(&store), store.records());
        assert!(!store.draft().is_editing());
    }

    #[test]
    fn test_delete_first_of_two() {
        let mut store = fresh(vec![10, 20]);
        let first = create(&mut store, "2023.1", "a@uni.edu");
        let second = create(&mut store, "2023.2", "b@uni.edu");

        let removed = store.delete(first).unwrap().unwrap();
        assert_eq!(removed.id, first);
        assert_eq!(store.records(), &[Record::new(second, "2023.2", "b@uni.edu")]);
        assert_eq!(persisted(&store), store.records());
    }

    #[test]
    fn test_invalid_email_keeps_form_and_draft() {
        let mut store = fresh(vec![10]);
        store.open_create_form();
        store.update_draft_field(Field::Name, "2024.1");
        store.update_draft_field(Field::Email, "bad-email");

        let err = store.submit().unwrap_err();
        assert!(matches!(err, StoreError::Validation(ValidationError::InvalidEmail)));
        assert_eq!(
            err.to_string(),
            "the supplied email is not valid; please enter a valid email."
        );
        assert!(store.records().is_empty());
        assert_eq!(store.repository().kv().writes(), 0);
        assert_eq!(store.form(), FormState::Visible(FormMode::Create));
        assert_eq!(store.draft().name, "2024.1");
        assert_eq!(store.draft().email, "bad-email");
    }

    #[test]
    fn test_fresh_load_is_empty() {
        let mut store = fresh(vec![]);
        assert!(store.records().is_empty());
        assert_eq!(store.form(), FormState::Hidden);
        assert_eq!(store.initialize().unwrap(), None);
        assert_eq!(store.repository().kv().writes(), 0);
    }

    #[test]
    fn test_validation_gate_never_mutates() {
        let mut store = fresh(vec![10, 20]);
        let id = create(&mut store, "2023.1", "a@uni.edu");
        let writes = store.repository().kv().writes();
        let before = store.records().to_vec();

        for (name, email) in [("", "a@uni.edu"), ("2023.2", ""), ("2023.2", "a@uni"), ("", "")] {
            store.open_create_form();
            store.update_draft_field(Field::Name, name);
            store.update_draft_field(Field::Email, email);
            assert!(matches!(store.submit(), Err(StoreError::Validation(_))));

            assert!(store.open_edit_form(id));
            store.update_draft_field(Field::Name, name);
            store.update_draft_field(Field::Email, email);
            assert!(matches!(store.submit(), Err(StoreError::Validation(_))));
        }

        assert_eq!(store.records(), before.as_slice());
        assert_eq!(store.repository().kv().writes(), writes);
    }

    #[test]
    fn test_edit_preserves_identity_and_position() {
        let mut store = fresh(vec![1, 2, 3]);
        let ids: Vec<u64> = ["a", "b", "c"]
            .iter()
            .map(|n| create(&mut store, n, "x@uni.edu"))
            .collect();

        store.open_edit_form(ids[1]);
        store.update_draft_field(Field::Name, "middle");
        store.submit().unwrap();

        let now: Vec<u64> = store.records().iter().map(|r| r.id).collect();
        assert_eq!(now, ids);
        assert_eq!(store.records()[1].name, "middle");
        assert_eq!(store.records()[0].name, "a");
        assert_eq!(store.records()[2].name, "c");
    }

    #[test]
    fn test_delete_is_exact_and_ordered() {
        let mut store = fresh(vec![1, 2, 3, 4]);
        let ids: Vec<u64> = ["a", "b", "c", "d"]
            .iter()
            .map(|n| create(&mut store, n, "x@uni.edu"))
            .collect();

        store.delete(ids[2]).unwrap();
        let names: Vec<&str> = store.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "d"]);
    }

    #[test]
    fn test_delete_unknown_is_silent() {
        let mut store = fresh(vec![1]);
        create(&mut store, "a", "x@uni.edu");
        let writes = store.repository().kv().writes();

        assert!(store.delete(999).unwrap().is_none());
        assert_eq!(store.records().len(), 1);
        assert_eq!(store.repository().kv().writes(), writes);
    }

    #[test]
    fn test_distinct_timestamps_give_unique_ids() {
        let times: Vec<u64> = (0..20).map(|i| 1_000 + i * 7).collect();
        let mut store = store_with(MemoryKeyValueStore::new(), IdStrategy::Timestamp, times);
        for i in 0..20 {
            create(&mut store, &format!("term {}", i), "x@uni.edu");
        }

        let mut ids: Vec<u64> = store.records().iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_timestamp_collision_is_reported() {
        let mut store = store_with(MemoryKeyValueStore::new(), IdStrategy::Timestamp, vec![5, 5]);
        create(&mut store, "a", "x@uni.edu");
        let writes = store.repository().kv().writes();

        store.open_create_form();
        store.update_draft_field(Field::Name, "b");
        store.update_draft_field(Field::Email, "y@uni.edu");
        assert!(matches!(store.submit(), Err(StoreError::DuplicateId(5))));

        assert_eq!(store.records().len(), 1);
        assert_eq!(store.repository().kv().writes(), writes);
        assert!(store.form().is_visible());
        assert_eq!(store.draft().name, "b");
    }

    #[test]
    fn test_monotonic_same_millisecond_is_unique() {
        let mut store = store_with(MemoryKeyValueStore::new(), IdStrategy::Monotonic, vec![5, 5, 5]);
        let a = create(&mut store, "a", "x@uni.edu");
        let b = create(&mut store, "b", "x@uni.edu");
        let c = create(&mut store, "c", "x@uni.edu");
        assert_eq!((a, b, c), (5, 6, 7));
    }

    #[test]
    fn test_monotonic_seeded_from_loaded_ids() {
        let kv = MemoryKeyValueStore::new()
            .with_blob("alunos", r#"[{"id":9000,"nome":"2022.2","email":"old@uni.edu"}]"#);
        let mut store = store_with(kv, IdStrategy::Monotonic, vec![100]);
        assert_eq!(store.records()[0].name, "2022.2");

        let id = create(&mut store, "2024.1", "new@uni.edu");
        assert_eq!(id, 9001);
    }

    #[test]
    fn test_open_create_resets_stale_draft() {
        let mut store = fresh(vec![1]);
        let id = create(&mut store, "a", "x@uni.edu");

        store.open_edit_form(id);
        store.update_draft_field(Field::Name, "half-typed");
        store.close_form();
        assert_eq!(store.form(), FormState::Hidden);

        store.open_create_form();
        assert_eq!(store.draft(), &Draft::default());
        assert_eq!(store.form(), FormState::Visible(FormMode::Create));
        assert_eq!(store.records()[0].name, "a");
    }

    #[test]
    fn test_open_edit_unknown_is_noop() {
        let mut store = fresh(vec![]);
        assert!(!store.open_edit_form(42));
        assert_eq!(store.form(), FormState::Hidden);
    }

    #[test]
    fn test_draft_changes_do_not_persist() {
        let mut store = fresh(vec![]);
        store.open_create_form();
        store.update_draft_field(Field::Name, "x");
        store.update_draft_field(Field::Email, "y");
        store.close_form();
        assert_eq!(store.repository().kv().writes(), 0);
    }

    #[test]
    fn test_submit_with_hidden_form() {
        let mut store = fresh(vec![]);
        store.update_draft_field(Field::Name, "a");
        store.update_draft_field(Field::Email, "x@uni.edu");
        assert!(matches!(store.submit(), Err(StoreError::FormClosed)));
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_edit_of_vanished_record_is_noop() {
        let mut store = fresh(vec![1]);
        let id = create(&mut store, "a", "x@uni.edu");
        store.open_edit_form(id);
        store.delete(id).unwrap();
        let writes = store.repository().kv().writes();

        store.update_draft_field(Field::Name, "b");
        assert_eq!(store.submit().unwrap(), Submitted::Missing(id));
        assert!(store.records().is_empty());
        assert_eq!(store.repository().kv().writes(), writes);
        assert_eq!(store.form(), FormState::Hidden);
    }

    #[test]
    fn test_reload_round_trip() {
        let mut store = fresh(vec![3, 1, 2]);
        create(&mut store, "c", "c@uni.edu");
        create(&mut store, "a", "a@uni.edu");
        let expected = store.records().to_vec();
        let blob = store.repository().raw().unwrap().unwrap();

        let reloaded = store_with(
            MemoryKeyValueStore::new().with_blob("alunos", &blob),
            IdStrategy::Monotonic,
            vec![],
        );
        assert_eq!(reloaded.records(), expected.as_slice());
    }

    #[test]
    fn test_corrupt_fail_policy_surfaces_error() {
        let kv = MemoryKeyValueStore::new().with_blob("alunos", "nope");
        let repo = RecordRepository::new(kv, "alunos", CorruptPolicy::Fail);
        let mut store = RecordStore::new(repo, IdGenerator::new(IdStrategy::Monotonic));
        assert!(matches!(store.initialize(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_corrupt_backup_policy_reports_backup_key() {
        let kv = MemoryKeyValueStore::new().with_blob("alunos", "nope");
        let repo = RecordRepository::new(kv, "alunos", CorruptPolicy::Backup);
        let mut store = RecordStore::new(repo, IdGenerator::new(IdStrategy::Monotonic));
        assert_eq!(store.initialize().unwrap().as_deref(), Some("alunos.corrupted"));
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_duplicate_ids_reported_and_preserved() {
        let blob = r#"[{"id":5,"name":"A","email":"a@uni.edu"},{"id":5,"name":"B","email":"b@uni.edu"}]"#;
        let kv = MemoryKeyValueStore::new().with_blob("alunos", blob);
        let repo = RecordRepository::new(kv, "alunos", CorruptPolicy::Backup);
        let mut store = RecordStore::new(
            repo,
            IdGenerator::with_clock(IdStrategy::Monotonic, scripted_clock(vec![100])),
        );

        assert_eq!(store.initialize().unwrap().as_deref(), Some("alunos.corrupted"));
        create(&mut store, "C", "c@uni.edu");

        let kv = store.repository().kv();
        assert_eq!(kv.get("alunos.corrupted").unwrap().as_deref(), Some(blob));
        assert_eq!(persisted(&store), vec![Record::new(100, "C", "c@uni.edu")]);
    }
}
