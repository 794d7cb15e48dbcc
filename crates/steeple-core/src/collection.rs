// ABOUTME: Single registry of every persisted collection: variant, bundle field, item type, storage key.
// ABOUTME: Derives CollectionKey, the typed Collections bundle, and CollectionItem impls from one list.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{
    AffiliateLink, Announcement, Asset, AssetFolder, Book, ChatMessage, Course, Devotional,
    EmailCampaign, LandingPage, Lead, MinistrySchedule, PrayerRequest, Servant, StaffMember, User,
    Video, WorshipSong,
};

/// Storage key of the configuration singleton. Not a collection: it holds an
/// object, never an array, and is backed up under the document's `config` field.
pub const CONFIG_KEY: &str = "jcbc_site_config";

/// An item type that lives in exactly one registered collection.
pub trait CollectionItem: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection this item type is stored in.
    const KEY: CollectionKey;

    /// Locally-unique identifier of the item within its collection.
    fn id(&self) -> &str;

    /// Borrow this type's slot in a `Collections` bundle.
    fn slot(collections: &Collections) -> &Vec<Self>;

    /// Mutably borrow this type's slot in a `Collections` bundle.
    fn slot_mut(collections: &mut Collections) -> &mut Vec<Self>;
}

macro_rules! collection_registry {
    ($( $variant:ident => $field:ident : $item:ty = $key:tt ),+ $(,)?) => {
        /// Identifies one persisted collection. Serializes as its storage key.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum CollectionKey {
            $(
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl CollectionKey {
            /// Every registered collection, in registry order.
            pub const ALL: &'static [CollectionKey] = &[$(CollectionKey::$variant),+];

            /// The fixed storage key this collection is persisted under.
            pub fn storage_key(self) -> &'static str {
                match self {
                    $(CollectionKey::$variant => $key,)+
                }
            }

            /// Resolve a storage key back to its collection.
            pub fn from_storage_key(key: &str) -> Option<Self> {
                match key {
                    $($key => Some(CollectionKey::$variant),)+
                    _ => None,
                }
            }
        }

        /// Every collection held in memory at once, as the admin panel edits them.
        /// Serializes as a map from storage key to item array, the same shape as
        /// a backup document's `data` field.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct Collections {
            $(
                #[serde(rename = $key)]
                pub $field: Vec<$item>,
            )+
        }

        impl Collections {
            /// Serialize one collection to its stored JSON form.
            pub fn to_value(&self, key: CollectionKey) -> Result<Value, serde_json::Error> {
                match key {
                    $(CollectionKey::$variant => serde_json::to_value(&self.$field),)+
                }
            }

            /// Replace one collection from its stored JSON form.
            pub fn set_value(&mut self, key: CollectionKey, value: Value) -> Result<(), serde_json::Error> {
                match key {
                    $(CollectionKey::$variant => self.$field = serde_json::from_value(value)?,)+
                }
                Ok(())
            }
        }

        $(
            impl CollectionItem for $item {
                const KEY: CollectionKey = CollectionKey::$variant;

                fn id(&self) -> &str {
                    &self.id
                }

                fn slot(collections: &Collections) -> &Vec<Self> {
                    &collections.$field
                }

                fn slot_mut(collections: &mut Collections) -> &mut Vec<Self> {
                    &mut collections.$field
                }
            }
        )+
    };
}

collection_registry! {
    Users => users: User = "jcbc_all_users",
    Announcements => announcements: Announcement = "jcbc_announcements",
    Devotionals => devotionals: Devotional = "jcbc_devotionals",
    Courses => courses: Course = "jcbc_courses",
    Books => books: Book = "jcbc_books",
    BibleStudies => bible_studies: Video = "jcbc_studies",
    LandingPages => landing_pages: LandingPage = "jcbc_landing_pages",
    AffiliateLinks => affiliate_links: AffiliateLink = "jcbc_affiliate_links",
    Staff => staff: StaffMember = "jcbc_staff",
    Servants => servants: Servant = "jcbc_servants",
    Schedules => schedules: MinistrySchedule = "jcbc_schedules",
    EmailCampaigns => email_campaigns: EmailCampaign = "jcbc_email_campaigns",
    WorshipSongs => worship_songs: WorshipSong = "jcbc_worship_songs",
    Assets => assets: Asset = "jcbc_assets",
    Folders => folders: AssetFolder = "jcbc_folders",
    Leads => leads: Lead = "jcbc_leads",
    Prayers => prayers: PrayerRequest = "jcbc_prayers",
    Chat => chat: ChatMessage = "jcbc_chat",
}

impl std::fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.storage_key())
    }
}

impl Collections {
    /// Borrow the items of one collection by type.
    pub fn items<T: CollectionItem>(&self) -> &Vec<T> {
        T::slot(self)
    }

    /// Mutably borrow the items of one collection by type.
    pub fn items_mut<T: CollectionItem>(&mut self) -> &mut Vec<T> {
        T::slot_mut(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn storage_keys_are_unique_and_distinct_from_config() {
        let keys: HashSet<&str> = CollectionKey::ALL.iter().map(|k| k.storage_key()).collect();
        assert_eq!(keys.len(), CollectionKey::ALL.len());
        assert!(!keys.contains(CONFIG_KEY));
    }

    #[test]
    fn storage_key_resolves_back_to_collection() {
        for key in CollectionKey::ALL {
            assert_eq!(CollectionKey::from_storage_key(key.storage_key()), Some(*key));
        }
        assert_eq!(CollectionKey::from_storage_key("jcbc_unknown"), None);
    }

    #[test]
    fn collection_key_serializes_as_storage_key() {
        let json = serde_json::to_string(&CollectionKey::BibleStudies).unwrap();
        assert_eq!(json, "\"jcbc_studies\"");
        let back: CollectionKey = serde_json::from_str("\"jcbc_folders\"").unwrap();
        assert_eq!(back, CollectionKey::Folders);
    }

    #[test]
    fn bundle_serializes_every_registered_key() {
        let value = serde_json::to_value(Collections::default()).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), CollectionKey::ALL.len());
        for key in CollectionKey::ALL {
            assert_eq!(obj[key.storage_key()], serde_json::json!([]));
        }
    }

    #[test]
    fn bundle_tolerates_missing_keys() {
        let bundle: Collections = serde_json::from_value(serde_json::json!({
            "jcbc_staff": [{"id": "s1", "name": "Ruth", "role": "Elder", "bio": "", "imageUrl": "", "order": 0}]
        }))
        .unwrap();
        assert_eq!(bundle.staff.len(), 1);
        assert!(bundle.announcements.is_empty());
    }

    #[test]
    fn set_value_replaces_only_the_named_collection() {
        let mut bundle = Collections::default();
        bundle
            .set_value(
                CollectionKey::Folders,
                serde_json::json!([{"id": "f1", "name": "Sermons", "parentId": null}]),
            )
            .unwrap();
        assert_eq!(bundle.items::<AssetFolder>().len(), 1);
        assert_eq!(bundle.to_value(CollectionKey::Assets).unwrap(), serde_json::json!([]));
    }

    #[test]
    fn item_key_matches_its_slot() {
        let mut bundle = Collections::default();
        bundle.items_mut::<Book>().push(Book {
            id: "b1".to_string(),
            title: "Acts".to_string(),
            ..Book::default()
        });
        assert_eq!(<Book as CollectionItem>::KEY, CollectionKey::Books);
        assert_eq!(bundle.books[0].id(), "b1");
    }
}
