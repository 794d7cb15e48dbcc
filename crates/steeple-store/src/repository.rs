// ABOUTME: Async collection repository: get/save per collection, the raw config pair, and domain mutations.
// ABOUTME: Every call waits a simulated latency so callers always observe a real async boundary.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use steeple_core::ids::now_millis;
use steeple_core::{
    Asset, AssetFolder, CONFIG_KEY, CascadeReport, ChatMessage, CollectionItem, CollectionKey,
    Collections, Course, LandingPage, Lead, PrayerRequest, Role, SiteConfig, StoredConfig, User,
    Video, cascade_delete_folder, new_item_id,
};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::backend::{KvStore, StoreError};
use crate::journal::{JournalError, commit_batch};
use crate::persisted::PersistedStore;

/// Latency every repository call waits before touching storage.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

const MIN_LATENCY: Duration = Duration::from_millis(1);

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Batch(#[from] JournalError),

    #[error("{collection} has no item {id:?}")]
    NotFound {
        collection: CollectionKey,
        id: String,
    },

    #[error("items do not fit {key}: {source}")]
    InvalidItems {
        key: CollectionKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored {key} cannot be decoded, refusing to overwrite it: {source}")]
    Unreadable {
        key: CollectionKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Invalid(String),

    #[error("role {} may not {action}", .role.as_str())]
    Forbidden { role: Role, action: &'static str },
}

impl RepositoryError {
    pub fn is_quota_exceeded(&self) -> bool {
        match self {
            RepositoryError::Store(e) => e.is_quota_exceeded(),
            RepositoryError::Batch(e) => e.is_quota_exceeded(),
            _ => false,
        }
    }

    fn not_found(collection: CollectionKey, id: &str) -> Self {
        RepositoryError::NotFound {
            collection,
            id: id.to_string(),
        }
    }
}

/// The single data-access layer for configuration and collections.
///
/// Plain `load`/`save` calls are independent, last-writer-wins writes. The
/// read-modify-write operations below serialize against each other so two
/// concurrent edits of one collection do not lose an update.
#[derive(Clone, Debug)]
pub struct Repository {
    store: PersistedStore,
    latency: Duration,
    mutation: Arc<Mutex<()>>,
}

impl Repository {
    pub fn new(backend: Arc<dyn KvStore>) -> Self {
        Self::from_store(PersistedStore::new(backend))
    }

    pub fn from_store(store: PersistedStore) -> Self {
        Self {
            store,
            latency: DEFAULT_LATENCY,
            mutation: Arc::new(Mutex::new(())),
        }
    }

    /// Override the simulated latency. Never drops below one millisecond.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency.max(MIN_LATENCY);
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn store(&self) -> &PersistedStore {
        &self.store
    }

    async fn pause(&self) {
        tokio::time::sleep(self.latency).await;
    }

    fn items<T: CollectionItem>(&self) -> Vec<T> {
        self.store.read(T::KEY.storage_key(), Vec::new())
    }

    /// Items for a read-modify-write. Stored data that does not decode is an
    /// error here, never an empty list that would then be written back.
    fn stored_items<T: CollectionItem>(&self) -> Result<Vec<T>, RepositoryError> {
        self.stored(T::KEY).map(Option::unwrap_or_default)
    }

    fn stored<T: serde::de::DeserializeOwned>(
        &self,
        key: CollectionKey,
    ) -> Result<Option<T>, RepositoryError> {
        match self.store.try_read(key.storage_key()) {
            Ok(value) => Ok(value),
            Err(StoreError::Json(source)) => {
                tracing::error!(%key, "stored items do not decode: {}", source);
                Err(RepositoryError::Unreadable { key, source })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn put_items<T: CollectionItem>(&self, items: &[T]) -> Result<(), RepositoryError> {
        self.store.write(T::KEY.storage_key(), items)?;
        Ok(())
    }

    // ---- collections ----

    /// Every item of one collection; empty if never saved or unreadable.
    pub async fn load<T: CollectionItem>(&self) -> Vec<T> {
        self.pause().await;
        self.items()
    }

    /// Replace one collection wholesale.
    pub async fn save<T: CollectionItem>(&self, items: &[T]) -> Result<(), RepositoryError> {
        self.pause().await;
        self.put_items(items)
    }

    /// One collection as stored JSON, including fields the model does not know.
    pub async fn load_value(&self, key: CollectionKey) -> Value {
        self.pause().await;
        self.raw_collection(key)
    }

    /// One collection as stored JSON for editing. Fails instead of falling
    /// back when the stored value is not an array of JSON values.
    pub async fn try_load_value(&self, key: CollectionKey) -> Result<Value, RepositoryError> {
        self.pause().await;
        let items: Option<Vec<Value>> = self.stored(key)?;
        Ok(Value::Array(items.unwrap_or_default()))
    }

    pub(crate) fn raw_collection(&self, key: CollectionKey) -> Value {
        match self.store.read_value(key.storage_key(), Value::Array(Vec::new())) {
            value @ Value::Array(_) => value,
            _ => {
                tracing::warn!(%key, "stored collection is not an array, using empty");
                Value::Array(Vec::new())
            }
        }
    }

    /// Replace one collection from JSON after checking every item fits its type.
    pub async fn save_value(&self, key: CollectionKey, value: Value) -> Result<(), RepositoryError> {
        self.pause().await;
        Collections::default()
            .set_value(key, value.clone())
            .map_err(|source| RepositoryError::InvalidItems { key, source })?;
        self.store.write(key.storage_key(), &value)?;
        Ok(())
    }

    // ---- configuration ----

    /// The configuration exactly as stored. Never merged with defaults.
    pub async fn get_config(&self) -> StoredConfig {
        self.pause().await;
        self.raw_config()
    }

    pub(crate) fn raw_config(&self) -> StoredConfig {
        self.store.read(CONFIG_KEY, StoredConfig::new())
    }

    /// Stored configuration merged over the defaults.
    pub async fn get_site_config(&self) -> SiteConfig {
        SiteConfig::merged(&self.get_config().await)
    }

    /// Full overwrite of the configuration singleton.
    pub async fn set_config(&self, config: &StoredConfig) -> Result<(), RepositoryError> {
        self.pause().await;
        self.store.write(CONFIG_KEY, config)?;
        Ok(())
    }

    // ---- batches ----

    /// Write several keys as one journaled batch. Returns the batch id.
    pub async fn write_batch(&self, writes: Vec<(String, Value)>) -> Result<String, RepositoryError> {
        self.pause().await;
        self.commit(writes).await
    }

    async fn commit(&self, writes: Vec<(String, Value)>) -> Result<String, RepositoryError> {
        Ok(commit_batch(&self.store, writes).await?)
    }

    // ---- users & academy ----

    /// Insert the user, or replace the stored user with the same id.
    pub async fn save_user(&self, user: User) -> Result<(), RepositoryError> {
        self.pause().await;
        let _guard = self.mutation.lock().await;
        let mut users: Vec<User> = self.stored_items()?;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => users.push(user),
        }
        self.put_items(&users)
    }

    async fn update_user<F>(&self, user_id: &str, edit: F) -> Result<User, RepositoryError>
    where
        F: FnOnce(&mut User) -> bool,
    {
        self.pause().await;
        let _guard = self.mutation.lock().await;
        let mut users: Vec<User> = self.stored_items()?;
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| RepositoryError::not_found(CollectionKey::Users, user_id))?;
        let changed = edit(user);
        let updated = user.clone();
        if changed {
            self.put_items(&users)?;
        }
        Ok(updated)
    }

    /// Mark a lesson complete for a user. Repeating it changes nothing.
    pub async fn record_progress(&self, user_id: &str, lesson_id: &str) -> Result<User, RepositoryError> {
        self.update_user(user_id, |user| user.progress_mut().complete_lesson(lesson_id))
            .await
    }

    pub async fn enroll(&self, user_id: &str, course_id: &str) -> Result<User, RepositoryError> {
        self.update_user(user_id, |user| {
            let added = user.progress_mut().enroll(course_id);
            let flagged = user.is_enrolled != Some(true);
            user.is_enrolled = Some(true);
            added || flagged
        })
        .await
    }

    /// Award the course certificate once every lesson is complete. Returns
    /// whether a certificate was newly awarded.
    pub async fn award_certificate_if_complete(
        &self,
        user_id: &str,
        course: &Course,
    ) -> Result<bool, RepositoryError> {
        let mut awarded = false;
        self.update_user(user_id, |user| {
            let progress = user.progress_mut();
            if course.is_complete_for(progress) {
                awarded = progress.award_certificate(&course.id);
            }
            awarded
        })
        .await?;
        if awarded {
            tracing::info!(user_id, course_id = %course.id, "certificate awarded");
        }
        Ok(awarded)
    }

    // ---- funnels ----

    /// Count a view of the active landing page at `slug` and return it.
    pub async fn record_page_view(&self, slug: &str) -> Result<LandingPage, RepositoryError> {
        self.pause().await;
        let _guard = self.mutation.lock().await;
        let mut pages: Vec<LandingPage> = self.stored_items()?;
        let page = pages
            .iter_mut()
            .find(|p| p.is_active && p.slug == slug)
            .ok_or_else(|| RepositoryError::not_found(CollectionKey::LandingPages, slug))?;
        page.views += 1;
        let viewed = page.clone();
        self.put_items(&pages)?;
        Ok(viewed)
    }

    /// Count a conversion on a landing page, capturing a lead when an email is given.
    pub async fn record_conversion(
        &self,
        page_id: &str,
        lead_email: Option<&str>,
    ) -> Result<LandingPage, RepositoryError> {
        self.pause().await;
        let _guard = self.mutation.lock().await;
        let mut pages: Vec<LandingPage> = self.stored_items()?;
        let page = pages
            .iter_mut()
            .find(|p| p.id == page_id)
            .ok_or_else(|| RepositoryError::not_found(CollectionKey::LandingPages, page_id))?;
        page.conversions += 1;
        let converted = page.clone();

        let mut writes = vec![(
            CollectionKey::LandingPages.storage_key().to_string(),
            serde_json::to_value(&pages).map_err(StoreError::from)?,
        )];

        if let Some(email) = lead_email.map(str::trim).filter(|e| !e.is_empty()) {
            let mut leads: Vec<Lead> = self.stored_items()?;
            leads.push(Lead {
                id: new_item_id(),
                email: email.to_string(),
                source: converted.slug.clone(),
                timestamp: now_millis(),
                ..Lead::default()
            });
            writes.push((
                CollectionKey::Leads.storage_key().to_string(),
                serde_json::to_value(&leads).map_err(StoreError::from)?,
            ));
        }

        self.commit(writes).await?;
        Ok(converted)
    }

    // ---- assets ----

    /// Delete a folder, its descendant folders, and every asset they held.
    pub async fn delete_folder(&self, folder_id: &str) -> Result<CascadeReport, RepositoryError> {
        self.pause().await;
        let _guard = self.mutation.lock().await;
        let mut folders: Vec<AssetFolder> = self.stored_items()?;
        let mut assets: Vec<Asset> = self.stored_items()?;

        let report = cascade_delete_folder(&mut folders, &mut assets, folder_id);
        if report.folders_removed.is_empty() {
            return Err(RepositoryError::not_found(CollectionKey::Folders, folder_id));
        }

        self.commit(vec![
            (
                CollectionKey::Folders.storage_key().to_string(),
                serde_json::to_value(&folders).map_err(StoreError::from)?,
            ),
            (
                CollectionKey::Assets.storage_key().to_string(),
                serde_json::to_value(&assets).map_err(StoreError::from)?,
            ),
        ])
        .await?;

        tracing::info!(
            folder_id,
            folders = report.folders_removed.len(),
            assets = report.assets_removed,
            "folder deleted"
        );
        Ok(report)
    }

    // ---- bible study ----

    /// Put a study video at the front of the library.
    pub async fn add_study(&self, mut video: Video) -> Result<Video, RepositoryError> {
        self.pause().await;
        let _guard = self.mutation.lock().await;
        if video.id.is_empty() {
            video.id = new_item_id();
        }
        let mut studies: Vec<Video> = self.stored_items()?;
        studies.insert(0, video.clone());
        self.put_items(&studies)?;
        Ok(video)
    }

    // ---- community ----

    /// Add a prayer request to the top of the wall.
    pub async fn submit_prayer(
        &self,
        user_id: &str,
        user_name: &str,
        request: &str,
    ) -> Result<PrayerRequest, RepositoryError> {
        let request = request.trim();
        if request.is_empty() {
            return Err(RepositoryError::Invalid("prayer request is empty".to_string()));
        }
        self.pause().await;
        let _guard = self.mutation.lock().await;
        let prayer = PrayerRequest {
            id: new_item_id(),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            request: request.to_string(),
            timestamp: now_millis(),
            ..PrayerRequest::default()
        };
        let mut prayers: Vec<PrayerRequest> = self.stored_items()?;
        prayers.insert(0, prayer.clone());
        self.put_items(&prayers)?;
        Ok(prayer)
    }

    /// Record that someone prayed for a request.
    pub async fn pray_for(&self, prayer_id: &str) -> Result<PrayerRequest, RepositoryError> {
        self.pause().await;
        let _guard = self.mutation.lock().await;
        let mut prayers: Vec<PrayerRequest> = self.stored_items()?;
        let prayer = prayers
            .iter_mut()
            .find(|p| p.id == prayer_id)
            .ok_or_else(|| RepositoryError::not_found(CollectionKey::Prayers, prayer_id))?;
        prayer.likes += 1;
        let updated = prayer.clone();
        self.put_items(&prayers)?;
        Ok(updated)
    }

    pub async fn post_chat_message(
        &self,
        user_id: &str,
        user_name: &str,
        role: Role,
        text: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RepositoryError::Invalid("chat message is empty".to_string()));
        }
        self.pause().await;
        let _guard = self.mutation.lock().await;
        let message = ChatMessage {
            id: new_item_id(),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            user_role: role.as_str().to_string(),
            text: text.to_string(),
            timestamp: now_millis(),
            ..ChatMessage::default()
        };
        let mut chat: Vec<ChatMessage> = self.stored_items()?;
        chat.push(message.clone());
        self.put_items(&chat)?;
        Ok(message)
    }

    /// Purge the chat history. Returns how many messages were removed.
    pub async fn clear_chat(&self, role: Role) -> Result<usize, RepositoryError> {
        if !role.can_moderate_chat() {
            return Err(RepositoryError::Forbidden {
                role,
                action: "clear the chat",
            });
        }
        self.pause().await;
        let _guard = self.mutation.lock().await;
        let removed = self.items::<ChatMessage>().len();
        self.put_items::<ChatMessage>(&[])?;
        tracing::info!(role = role.as_str(), removed, "chat cleared");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::backend::MemoryStore;
    use steeple_core::ordering::sort_announcements;
    use steeple_core::{Announcement, Book, Lesson, Priority, StaffMember};

    fn repo() -> Repository {
        Repository::new(Arc::new(MemoryStore::new())).with_latency(Duration::from_millis(1))
    }

    fn repo_over(backend: &Arc<MemoryStore>) -> Repository {
        let store: Arc<dyn KvStore> = backend.clone();
        Repository::new(store).with_latency(Duration::from_millis(1))
    }

    fn stored_json(backend: &MemoryStore, key: &str) -> Value {
        serde_json::from_str(&backend.get(key).unwrap().unwrap()).unwrap()
    }

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            email: format!("{}@example.org", id),
            name: id.to_string(),
            ..User::default()
        }
    }

    fn course_with_lessons(id: &str, lesson_ids: &[&str]) -> Course {
        Course {
            id: id.to_string(),
            lessons: lesson_ids
                .iter()
                .enumerate()
                .map(|(i, l)| Lesson {
                    id: l.to_string(),
                    order: i as i64,
                    ..Lesson::default()
                })
                .collect(),
            ..Course::default()
        }
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let repo = repo();
        let books = vec![Book {
            id: "b1".to_string(),
            title: "Romans".to_string(),
            ..Book::default()
        }];
        let staff = vec![StaffMember {
            id: "s1".to_string(),
            name: "Ruth".to_string(),
            order: 2,
            ..StaffMember::default()
        }];

        repo.save(&books).await.unwrap();
        repo.save(&staff).await.unwrap();

        assert_eq!(repo.load::<Book>().await, books);
        assert_eq!(repo.load::<StaffMember>().await, staff);
    }

    #[tokio::test]
    async fn every_collection_round_trips_as_json() {
        let repo = repo();
        for key in CollectionKey::ALL {
            let value = serde_json::json!([{ "id": format!("{}-1", key) }]);
            repo.save_value(*key, value).await.unwrap();
        }
        for key in CollectionKey::ALL {
            let loaded = repo.load_value(*key).await;
            assert_eq!(loaded[0]["id"], format!("{}-1", key), "collection {}", key);
        }
    }

    #[tokio::test]
    async fn save_value_rejects_items_of_wrong_shape() {
        let repo = repo();
        let err = repo
            .save_value(CollectionKey::Staff, serde_json::json!([{"order": "first"}]))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidItems { key: CollectionKey::Staff, .. }));
        assert!(repo.load::<StaffMember>().await.is_empty());
    }

    #[tokio::test]
    async fn config_is_returned_unmerged() {
        let repo = repo();
        assert!(repo.get_config().await.is_empty());

        let mut stored = StoredConfig::new();
        stored.insert("churchName", "Test Church");
        repo.set_config(&stored).await.unwrap();

        let raw = repo.get_config().await;
        assert_eq!(raw.len(), 1);

        let merged = repo.get_site_config().await;
        assert_eq!(merged.church_name, "Test Church");
        assert_eq!(merged.welcome_title, SiteConfig::default().welcome_title);
    }

    #[tokio::test]
    async fn operations_observe_latency() {
        let repo = Repository::new(Arc::new(MemoryStore::new()))
            .with_latency(Duration::from_millis(25));
        let start = Instant::now();
        let _ = repo.load::<Book>().await;
        assert!(start.elapsed() >= Duration::from_millis(25));
    }

    #[test]
    fn zero_latency_is_clamped() {
        let repo = Repository::new(Arc::new(MemoryStore::new())).with_latency(Duration::ZERO);
        assert_eq!(repo.latency(), MIN_LATENCY);
    }

    #[tokio::test]
    async fn quota_failure_surfaces_from_save() {
        let repo = Repository::new(Arc::new(MemoryStore::with_quota(64)))
            .with_latency(Duration::from_millis(1));
        let books = vec![Book {
            id: "b1".to_string(),
            description: "x".repeat(256),
            ..Book::default()
        }];
        let err = repo.save(&books).await.unwrap_err();
        assert!(err.is_quota_exceeded());
    }

    #[tokio::test]
    async fn urgent_announcement_sorts_before_newer_normal() {
        let repo = repo();
        repo.save(&[
            Announcement {
                id: "1".to_string(),
                priority: Priority::Urgent,
                timestamp: 100,
                ..Announcement::default()
            },
            Announcement {
                id: "2".to_string(),
                priority: Priority::Normal,
                timestamp: 200,
                ..Announcement::default()
            },
        ])
        .await
        .unwrap();

        let mut items = repo.load::<Announcement>().await;
        sort_announcements(&mut items);
        let ids: Vec<&str> = items.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn save_user_upserts() {
        let repo = repo();
        repo.save_user(user("u1")).await.unwrap();
        let mut renamed = user("u1");
        renamed.name = "Lydia".to_string();
        repo.save_user(renamed).await.unwrap();
        repo.save_user(user("u2")).await.unwrap();

        let users = repo.load::<User>().await;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "Lydia");
    }

    #[tokio::test]
    async fn record_progress_creates_progress_and_is_idempotent() {
        let repo = repo();
        repo.save_user(user("u1")).await.unwrap();

        repo.record_progress("u1", "l1").await.unwrap();
        let updated = repo.record_progress("u1", "l1").await.unwrap();

        let progress = updated.progress.unwrap();
        assert_eq!(progress.completed_lessons, vec!["l1"]);
        let stored = repo.load::<User>().await;
        assert_eq!(stored[0].progress.as_ref().unwrap().completed_lessons, vec!["l1"]);
    }

    #[tokio::test]
    async fn record_progress_for_unknown_user_fails() {
        let repo = repo();
        let err = repo.record_progress("ghost", "l1").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { collection: CollectionKey::Users, .. }));
    }

    #[tokio::test]
    async fn enroll_sets_flag_and_course() {
        let repo = repo();
        repo.save_user(user("u1")).await.unwrap();
        let updated = repo.enroll("u1", "c1").await.unwrap();
        assert_eq!(updated.is_enrolled, Some(true));
        assert_eq!(updated.progress.unwrap().enrolled_courses, vec!["c1"]);
    }

    #[tokio::test]
    async fn certificate_awarded_only_when_course_complete() {
        let repo = repo();
        repo.save_user(user("u1")).await.unwrap();
        let course = course_with_lessons("c1", &["l1", "l2"]);

        repo.record_progress("u1", "l1").await.unwrap();
        assert!(!repo.award_certificate_if_complete("u1", &course).await.unwrap());

        repo.record_progress("u1", "l2").await.unwrap();
        assert!(repo.award_certificate_if_complete("u1", &course).await.unwrap());
        assert!(!repo.award_certificate_if_complete("u1", &course).await.unwrap());

        let users = repo.load::<User>().await;
        assert_eq!(users[0].progress.as_ref().unwrap().certificates, vec!["c1"]);
    }

    #[tokio::test]
    async fn page_view_counts_only_active_pages() {
        let repo = repo();
        repo.save(&[
            LandingPage {
                id: "p1".to_string(),
                slug: "free-ebook".to_string(),
                is_active: true,
                ..LandingPage::default()
            },
            LandingPage {
                id: "p2".to_string(),
                slug: "draft".to_string(),
                is_active: false,
                ..LandingPage::default()
            },
        ])
        .await
        .unwrap();

        repo.record_page_view("free-ebook").await.unwrap();
        let page = repo.record_page_view("free-ebook").await.unwrap();
        assert_eq!(page.views, 2);

        assert!(repo.record_page_view("draft").await.is_err());
        let stored = repo.load::<LandingPage>().await;
        assert_eq!(stored[0].views, 2);
        assert_eq!(stored[1].views, 0);
    }

    #[tokio::test]
    async fn conversion_records_lead_with_page_slug() {
        let repo = repo();
        repo.save(&[LandingPage {
            id: "p1".to_string(),
            slug: "free-ebook".to_string(),
            is_active: true,
            ..LandingPage::default()
        }])
        .await
        .unwrap();

        repo.record_conversion("p1", Some("  ruth@example.org ")).await.unwrap();
        let page = repo.record_conversion("p1", None).await.unwrap();

        assert_eq!(page.conversions, 2);
        let leads = repo.load::<Lead>().await;
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].email, "ruth@example.org");
        assert_eq!(leads[0].source, "free-ebook");
    }

    #[tokio::test]
    async fn delete_folder_cascades_to_assets() {
        let repo = repo();
        repo.save(&[
            AssetFolder {
                id: "F".to_string(),
                name: "Sermons".to_string(),
                parent_id: None,
                ..AssetFolder::default()
            },
            AssetFolder {
                id: "G".to_string(),
                name: "Easter".to_string(),
                parent_id: Some("F".to_string()),
                ..AssetFolder::default()
            },
        ])
        .await
        .unwrap();
        repo.save(&[
            Asset {
                id: "a1".to_string(),
                folder_id: Some("F".to_string()),
                ..Asset::default()
            },
            Asset {
                id: "a2".to_string(),
                folder_id: Some("G".to_string()),
                ..Asset::default()
            },
            Asset {
                id: "a3".to_string(),
                folder_id: None,
                ..Asset::default()
            },
        ])
        .await
        .unwrap();

        let report = repo.delete_folder("F").await.unwrap();
        assert_eq!(report.assets_removed, 2);

        let assets = repo.load::<Asset>().await;
        assert!(assets.iter().all(|a| a.folder_id.as_deref() != Some("F")));
        assert_eq!(assets.len(), 1);
        assert!(repo.load::<AssetFolder>().await.is_empty());

        assert!(matches!(
            repo.delete_folder("F").await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn prayers_prepend_and_count_likes() {
        let repo = repo();
        let first = repo.submit_prayer("u1", "Ruth", "For healing").await.unwrap();
        repo.submit_prayer("u2", "Boaz", "For the harvest").await.unwrap();
        repo.pray_for(&first.id).await.unwrap();

        let prayers = repo.load::<PrayerRequest>().await;
        assert_eq!(prayers[0].request, "For the harvest");
        assert_eq!(prayers[1].likes, 1);

        assert!(repo.submit_prayer("u1", "Ruth", "   ").await.is_err());
    }

    #[tokio::test]
    async fn chat_rejects_empty_and_gates_clearing() {
        let repo = repo();
        let msg = repo
            .post_chat_message("u1", "Ruth", Role::Member, "  Amen!  ")
            .await
            .unwrap();
        assert_eq!(msg.text, "Amen!");
        assert_eq!(msg.user_role, "member");
        assert!(matches!(
            repo.post_chat_message("u1", "Ruth", Role::Member, " ").await,
            Err(RepositoryError::Invalid(_))
        ));

        assert!(matches!(
            repo.clear_chat(Role::Staff).await,
            Err(RepositoryError::Forbidden { .. })
        ));
        assert_eq!(repo.load::<ChatMessage>().await.len(), 1);

        assert_eq!(repo.clear_chat(Role::Pastor).await.unwrap(), 1);
        assert!(repo.load::<ChatMessage>().await.is_empty());
    }

    #[tokio::test]
    async fn add_study_prepends_and_assigns_id() {
        let repo = repo();
        repo.add_study(Video {
            id: "old".to_string(),
            ..Video::default()
        })
        .await
        .unwrap();
        let added = repo.add_study(Video::default()).await.unwrap();

        assert!(!added.id.is_empty());
        let studies = repo.load::<Video>().await;
        assert_eq!(studies[0].id, added.id);
        assert_eq!(studies[1].id, "old");
    }

    #[tokio::test]
    async fn user_with_unfamiliar_role_survives_saving_another_user() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .set(
                "jcbc_all_users",
                r#"[{"id":"u1","role":"elder"},{"id":"u2","role":"member"}]"#,
            )
            .unwrap();
        let repo = repo_over(&backend);

        repo.save_user(user("u3")).await.unwrap();

        let stored = stored_json(&backend, "jcbc_all_users");
        let ids: Vec<&str> = stored
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["u1", "u2", "u3"]);
        assert_eq!(stored[0]["role"], "elder");
    }

    #[tokio::test]
    async fn undecodable_collection_blocks_mutations_and_stays_intact() {
        let backend = Arc::new(MemoryStore::new());
        let original = r#"[{"id":"p1","likes":"many"}]"#;
        backend.set("jcbc_prayers", original).unwrap();
        let repo = repo_over(&backend);

        let err = repo.submit_prayer("u1", "Ruth", "For rain").await.unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Unreadable { key: CollectionKey::Prayers, .. }
        ));
        assert!(repo.pray_for("p1").await.is_err());
        assert_eq!(backend.get("jcbc_prayers").unwrap().as_deref(), Some(original));

        // Display reads still fall back to empty.
        assert!(repo.load::<PrayerRequest>().await.is_empty());
        assert!(repo.try_load_value(CollectionKey::Prayers).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_item_fields_survive_a_page_view() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .set(
                "jcbc_landing_pages",
                r#"[{"id":"p1","slug":"easter","isActive":true,"views":4,"abTestGroup":"B"}]"#,
            )
            .unwrap();
        let repo = repo_over(&backend);

        repo.record_page_view("easter").await.unwrap();

        let stored = stored_json(&backend, "jcbc_landing_pages");
        assert_eq!(stored[0]["views"], 5);
        assert_eq!(stored[0]["abTestGroup"], "B");
    }

    #[tokio::test]
    async fn editing_load_rejects_non_json_collection() {
        let backend = Arc::new(MemoryStore::new());
        backend.set("jcbc_books", "{oops").unwrap();
        let repo = repo_over(&backend);

        assert!(matches!(
            repo.try_load_value(CollectionKey::Books).await,
            Err(RepositoryError::Unreadable { key: CollectionKey::Books, .. })
        ));
        assert_eq!(repo.load_value(CollectionKey::Books).await, serde_json::json!([]));
    }
}
