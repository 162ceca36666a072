use std::ops::RangeInclusive;

use entity::employees::Model;
use tracing::instrument;

use crate::{
    error::EmployeeError,
    store::{EmployeeDraft, EmployeeStore},
};

const HIRING_AGE: RangeInclusive<i32> = 18..=65;
const SALARY_FLOOR_AGE: i32 = 30;
const SALARY_FLOOR: f64 = 20_000.0;

/// Validation and lifecycle gate in front of the record store. Stateless;
/// every call is at most one store read plus one store write.
pub struct EmployeeService<S> {
    store: S,
}

impl<S: EmployeeStore> EmployeeService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Full collection, in whatever order the store returns.
    pub async fn list_all(&self) -> Result<Vec<Model>, EmployeeError> {
        self.store.get_all().await.map_err(EmployeeError::Store)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Model, EmployeeError> {
        self.store
            .get_employee_by_id(id)
            .await
            .map_err(EmployeeError::Store)?
            .ok_or(EmployeeError::NotFound(id))
    }

    /// Admits the candidate or fails without touching the store.
    #[instrument(name = "hr.employees.create", skip_all, fields(age = candidate.age))]
    pub async fn create(&self, mut candidate: EmployeeDraft) -> Result<Model, EmployeeError> {
        check_admissible(&candidate)?;
        // A freshly created employee is active no matter what the caller sent.
        candidate.active = true;
        self.store
            .add_employee(candidate)
            .await
            .map_err(EmployeeError::Store)
    }

    /// Inactive records reject the update outright, before any field of the
    /// payload is considered. Active records re-validate like `create`.
    #[instrument(name = "hr.employees.update", skip_all, fields(id = id))]
    pub async fn update(&self, id: i32, updated: EmployeeDraft) -> Result<Model, EmployeeError> {
        let existing = self.find_by_id(id).await?;
        if !existing.active {
            return Err(EmployeeError::EmployeeInactive(id));
        }
        check_admissible(&updated)?;
        self.store
            .update_employee(id, updated)
            .await
            .map_err(EmployeeError::Store)
    }
}

/// Age is checked before salary; the first violation wins and the two are
/// never reported together.
fn check_admissible(draft: &EmployeeDraft) -> Result<(), EmployeeError> {
    if !HIRING_AGE.contains(&draft.age) {
        return Err(EmployeeError::AgeNotValid(draft.age));
    }
    if draft.age > SALARY_FLOOR_AGE && draft.salary <= SALARY_FLOOR {
        return Err(EmployeeError::SalaryNotValid {
            age: draft.age,
            salary: draft.salary,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use entity::employees::Gender;

    use super::*;

    #[derive(Default)]
    struct RecordingStore {
        records: Mutex<Vec<Model>>,
        added: Mutex<Vec<EmployeeDraft>>,
        updated: Mutex<Vec<(i32, EmployeeDraft)>>,
    }

    impl RecordingStore {
        fn seeded(records: Vec<Model>) -> Self {
            Self {
                records: Mutex::new(records),
                ..Self::default()
            }
        }

        fn add_calls(&self) -> usize {
            self.added.lock().unwrap().len()
        }

        fn update_calls(&self) -> usize {
            self.updated.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl EmployeeStore for &RecordingStore {
        async fn get_all(&self) -> anyhow::Result<Vec<Model>> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn get_employee_by_id(&self, id: i32) -> anyhow::Result<Option<Model>> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|record| record.id == id)
                .cloned())
        }

        async fn add_employee(&self, draft: EmployeeDraft) -> anyhow::Result<Model> {
            let mut records = self.records.lock().unwrap();
            let record = materialize(records.len() as i32 + 1, &draft);
            records.push(record.clone());
            self.added.lock().unwrap().push(draft);
            Ok(record)
        }

        async fn update_employee(&self, id: i32, draft: EmployeeDraft) -> anyhow::Result<Model> {
            let mut records = self.records.lock().unwrap();
            let record = records
                .iter_mut()
                .find(|record| record.id == id)
                .expect("update_employee called for unknown id");
            record.name = draft.name.clone();
            record.age = draft.age;
            record.gender = draft.gender;
            record.salary = draft.salary;
            let updated = record.clone();
            self.updated.lock().unwrap().push((id, draft));
            Ok(updated)
        }
    }

    fn materialize(id: i32, draft: &EmployeeDraft) -> Model {
        let now = Utc::now();
        Model {
            id,
            name: draft.name.clone(),
            age: draft.age,
            gender: draft.gender,
            salary: draft.salary,
            active: draft.active,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn draft(age: i32, salary: f64) -> EmployeeDraft {
        EmployeeDraft {
            name: "Lucy".into(),
            age,
            gender: Gender::Female,
            salary,
            active: true,
        }
    }

    fn stored(id: i32, active: bool) -> Model {
        let mut record = materialize(id, &draft(35, 300_000.0));
        record.active = active;
        record
    }

    #[tokio::test]
    async fn list_all_returns_records_in_store_order() {
        let store = RecordingStore::seeded(vec![stored(1, true), stored(2, false)]);
        let service = EmployeeService::new(&store);

        let all = service.list_all().await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, 1);
        assert_eq!(all[1].id, 2);
    }

    #[tokio::test]
    async fn create_returns_the_persisted_record() {
        let store = RecordingStore::default();
        let service = EmployeeService::new(&store);

        let created = service.create(draft(18, 8_000.0)).await.unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Lucy");
        assert_eq!(store.add_calls(), 1);
    }

    #[tokio::test]
    async fn create_rejects_age_below_minimum_without_store_call() {
        let store = RecordingStore::default();
        let service = EmployeeService::new(&store);

        let err = service.create(draft(6, 8_000.0)).await.unwrap_err();

        assert!(matches!(err, EmployeeError::AgeNotValid(6)));
        assert_eq!(store.add_calls(), 0);
    }

    #[tokio::test]
    async fn create_rejects_age_above_maximum_regardless_of_salary() {
        let store = RecordingStore::default();
        let service = EmployeeService::new(&store);

        let err = service.create(draft(90, 800_000.0)).await.unwrap_err();

        assert!(matches!(err, EmployeeError::AgeNotValid(90)));
        assert_eq!(store.add_calls(), 0);
    }

    #[tokio::test]
    async fn create_rejects_low_salary_over_thirty() {
        let store = RecordingStore::default();
        let service = EmployeeService::new(&store);

        let err = service.create(draft(35, 3_000.0)).await.unwrap_err();

        assert!(matches!(err, EmployeeError::SalaryNotValid { age: 35, .. }));
        assert_eq!(store.add_calls(), 0);
    }

    #[tokio::test]
    async fn salary_floor_is_strict_at_the_boundary() {
        let store = RecordingStore::default();
        let service = EmployeeService::new(&store);

        let err = service.create(draft(31, 20_000.0)).await.unwrap_err();
        assert!(matches!(err, EmployeeError::SalaryNotValid { age: 31, .. }));

        service.create(draft(31, 20_000.01)).await.unwrap();
        assert_eq!(store.add_calls(), 1);
    }

    #[tokio::test]
    async fn salary_floor_does_not_apply_at_thirty_or_below() {
        let store = RecordingStore::default();
        let service = EmployeeService::new(&store);

        service.create(draft(30, 0.0)).await.unwrap();
        service.create(draft(25, 3_000.0)).await.unwrap();

        assert_eq!(store.add_calls(), 2);
    }

    #[tokio::test]
    async fn create_accepts_the_age_boundaries() {
        let store = RecordingStore::default();
        let service = EmployeeService::new(&store);

        service.create(draft(18, 0.0)).await.unwrap();
        service.create(draft(65, 30_000.0)).await.unwrap();
        let err = service.create(draft(17, 30_000.0)).await.unwrap_err();

        assert!(matches!(err, EmployeeError::AgeNotValid(17)));
        assert_eq!(store.add_calls(), 2);
    }

    #[tokio::test]
    async fn create_forces_the_active_flag() {
        let store = RecordingStore::default();
        let service = EmployeeService::new(&store);
        let mut candidate = draft(35, 300_000.0);
        candidate.active = false;

        let created = service.create(candidate).await.unwrap();

        assert!(created.active);
        assert!(store.added.lock().unwrap()[0].active);
    }

    #[tokio::test]
    async fn update_rejects_an_inactive_record_before_validation() {
        let store = RecordingStore::seeded(vec![stored(1, false)]);
        let service = EmployeeService::new(&store);

        // Payload is itself invalid; the inactive gate must win.
        let err = service.update(1, draft(6, 0.0)).await.unwrap_err();

        assert!(matches!(err, EmployeeError::EmployeeInactive(1)));
        assert_eq!(store.update_calls(), 0);
        assert_eq!(store.add_calls(), 0);
    }

    #[tokio::test]
    async fn update_revalidates_an_active_record() {
        let store = RecordingStore::seeded(vec![stored(1, true)]);
        let service = EmployeeService::new(&store);

        let err = service.update(1, draft(35, 3_000.0)).await.unwrap_err();

        assert!(matches!(err, EmployeeError::SalaryNotValid { age: 35, .. }));
        assert_eq!(store.update_calls(), 0);
    }

    #[tokio::test]
    async fn update_persists_an_admissible_payload() {
        let store = RecordingStore::seeded(vec![stored(1, true)]);
        let service = EmployeeService::new(&store);

        let updated = service.update(1, draft(36, 50_000.0)).await.unwrap();

        assert_eq!(updated.age, 36);
        assert_eq!(updated.salary, 50_000.0);
        assert_eq!(store.update_calls(), 1);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let store = RecordingStore::default();
        let service = EmployeeService::new(&store);

        let err = service.update(42, draft(35, 300_000.0)).await.unwrap_err();

        assert!(matches!(err, EmployeeError::NotFound(42)));
        assert_eq!(store.update_calls(), 0);
    }
}
