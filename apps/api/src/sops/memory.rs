use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::sop::{NewSop, SopRow, SopUpdate};
use crate::sops::store::SopStore;

/// In-process document store. Same ownership rules as the Postgres store.
#[derive(Default)]
pub struct MemorySopStore {
    rows: RwLock<HashMap<Uuid, SopRow>>,
}

impl MemorySopStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SopStore for MemorySopStore {
    async fn insert(&self, owner_id: &str, new_sop: NewSop) -> Result<SopRow, AppError> {
        let now = Utc::now();
        let row = SopRow {
            id: Uuid::new_v4(),
            user_id: owner_id.to_string(),
            profile: new_sop.profile,
            generated_sop: new_sop.generated_sop,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_owned(&self, owner_id: &str) -> Result<Vec<SopRow>, AppError> {
        let mut rows: Vec<SopRow> = self
            .rows
            .read()
            .await
            .values()
            .filter(|r| r.user_id == owner_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_owned(&self, owner_id: &str, id: Uuid) -> Result<Option<SopRow>, AppError> {
        Ok(self
            .rows
            .read()
            .await
            .get(&id)
            .filter(|r| r.user_id == owner_id)
            .cloned())
    }

    async fn update_owned(
        &self,
        owner_id: &str,
        id: Uuid,
        update: SopUpdate,
    ) -> Result<Option<SopRow>, AppError> {
        let mut rows = self.rows.write().await;
        let Some(row) = rows.get_mut(&id).filter(|r| r.user_id == owner_id) else {
            return Ok(None);
        };
        update.apply_to(row);
        row.touch(Utc::now());
        Ok(Some(row.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sop::ApplicantProfile;

    fn new_sop(name: &str) -> NewSop {
        NewSop {
            profile: ApplicantProfile {
                full_name: name.to_string(),
                ..Default::default()
            },
            generated_sop: Some(format!("SOP for {name}")),
        }
    }

    #[tokio::test]
    async fn test_rows_are_invisible_to_other_owners() {
        let store = MemorySopStore::new();
        let row = store.insert("user-a", new_sop("A")).await.unwrap();

        assert!(store.find_owned("user-b", row.id).await.unwrap().is_none());
        assert!(store
            .update_owned("user-b", row.id, SopUpdate::with_generated_sop("x".into()))
            .await
            .unwrap()
            .is_none());
        assert!(store.list_owned("user-b").await.unwrap().is_empty());

        let found = store.find_owned("user-a", row.id).await.unwrap().unwrap();
        assert_eq!(found.generated_sop.as_deref(), Some("SOP for A"));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = MemorySopStore::new();
        let first = store.insert("user-a", new_sop("first")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.insert("user-a", new_sop("second")).await.unwrap();
        store.insert("user-b", new_sop("other")).await.unwrap();

        let ids: Vec<Uuid> = store
            .list_owned("user-a")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_update_keeps_owner_and_creation_time() {
        let store = MemorySopStore::new();
        let row = store.insert("user-a", new_sop("A")).await.unwrap();

        let updated = store
            .update_owned("user-a", row.id, SopUpdate::with_generated_sop("v2".into()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.generated_sop.as_deref(), Some("v2"));
        assert_eq!(updated.user_id, "user-a");
        assert_eq!(updated.created_at, row.created_at);
        assert!(updated.updated_at > updated.created_at);
    }
}
