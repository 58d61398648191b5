use super::meetup_repo::{MeetupRepository, Page};
use crate::error::{AppError, Result};
use crate::models::{Meetup, MeetupFields};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Store {
    next_id: i64,
    meetups: BTreeMap<i64, Meetup>,
}

/// Process-local repository used by the test suites.
///
/// When constructed with [`InMemoryMeetupRepository::with_files`], writes
/// referencing an unknown banner file fail the same way the PostgreSQL
/// foreign key does.
#[derive(Default)]
pub struct InMemoryMeetupRepository {
    store: RwLock<Store>,
    known_files: Option<HashSet<i64>>,
}

impl InMemoryMeetupRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(file_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            store: RwLock::default(),
            known_files: Some(file_ids.into_iter().collect()),
        }
    }

    /// Store a meetup as-is, bypassing service rules. Returns the assigned id.
    pub async fn insert_raw(&self, mut meetup: Meetup) -> i64 {
        let mut store = self.store.write().await;
        store.next_id += 1;
        meetup.id = store.next_id;
        store.meetups.insert(meetup.id, meetup);
        store.next_id
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.meetups.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_file(&self, file_id: i64) -> Result<()> {
        match &self.known_files {
            Some(files) if !files.contains(&file_id) => Err(AppError::UnknownFile(file_id)),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl MeetupRepository for InMemoryMeetupRepository {
    async fn list_by_organizer(&self, user_id: Uuid, page: Page) -> Result<Vec<Meetup>> {
        let store = self.store.read().await;

        let mut meetups: Vec<Meetup> = store
            .meetups
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        meetups.sort_by_key(|m| (m.date, m.id));

        let skip = usize::try_from(page.offset).unwrap_or(0);
        let take = page
            .limit
            .map(|l| usize::try_from(l).unwrap_or(0))
            .unwrap_or(usize::MAX);

        Ok(meetups.into_iter().skip(skip).take(take).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Meetup>> {
        Ok(self.store.read().await.meetups.get(&id).cloned())
    }

    async fn create(&self, user_id: Uuid, fields: &MeetupFields) -> Result<Meetup> {
        self.check_file(fields.file_id)?;

        let now = Utc::now();
        let mut store = self.store.write().await;
        store.next_id += 1;

        let meetup = Meetup {
            id: store.next_id,
            title: fields.title.clone(),
            description: fields.description.clone(),
            location: fields.location.clone(),
            date: fields.date,
            user_id,
            file_id: fields.file_id,
            created_at: now,
            updated_at: now,
        };
        store.meetups.insert(meetup.id, meetup.clone());

        Ok(meetup)
    }

    async fn update(&self, id: i64, fields: &MeetupFields) -> Result<Option<Meetup>> {
        self.check_file(fields.file_id)?;

        let mut store = self.store.write().await;
        let Some(meetup) = store.meetups.get_mut(&id) else {
            return Ok(None);
        };

        meetup.title = fields.title.clone();
        meetup.description = fields.description.clone();
        meetup.location = fields.location.clone();
        meetup.date = fields.date;
        meetup.file_id = fields.file_id;
        meetup.updated_at = Utc::now();

        Ok(Some(meetup.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.store.write().await.meetups.remove(&id).is_some())
    }
}
