// ABOUTME: Core library for steeple, containing the site configuration model and content types.
// ABOUTME: Defines the collection registry shared by the store, the server, and backups.

pub mod collection;
pub mod config;
pub mod ids;
pub mod model;
pub mod ordering;

pub use collection::{CONFIG_KEY, CollectionItem, CollectionKey, Collections};
pub use config::{AutomationProvider, HeaderStyle, SiteConfig, StoredConfig};
pub use ids::new_item_id;
pub use model::*;
