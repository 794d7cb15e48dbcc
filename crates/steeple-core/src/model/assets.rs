// ABOUTME: Asset library types: uploaded files and the folders that hold them.
// ABOUTME: The folder cascade is performed by callers; the store never enforces referential integrity.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    #[default]
    Image,
    Video,
    Document,
    Audio,
}

impl AssetKind {
    /// Classify an upload by its MIME type.
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("video/") {
            AssetKind::Video
        } else if mime.starts_with("image/") {
            AssetKind::Image
        } else if mime.starts_with("audio/") {
            AssetKind::Audio
        } else {
            AssetKind::Document
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetFolder {
    pub id: String,
    pub name: String,
    /// None for a top-level folder.
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Asset {
    pub id: String,
    /// Original file name.
    pub name: String,
    /// Base64 data URL or external URL.
    pub data: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    /// Owning folder, None for the library root.
    pub folder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Human-readable size, e.g. "2.40 MB".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub timestamp: i64,
    /// Stored fields without a typed counterpart, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What a folder cascade removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub folders_removed: Vec<String>,
    pub assets_removed: usize,
}

/// Delete a folder together with its descendant folders, then every asset
/// that lived in any removed folder. Unknown ids remove nothing.
pub fn cascade_delete_folder(
    folders: &mut Vec<AssetFolder>,
    assets: &mut Vec<Asset>,
    folder_id: &str,
) -> CascadeReport {
    if !folders.iter().any(|f| f.id == folder_id) {
        return CascadeReport::default();
    }

    let mut doomed: HashSet<String> = HashSet::new();
    doomed.insert(folder_id.to_string());
    loop {
        let before = doomed.len();
        for folder in folders.iter() {
            if let Some(parent) = &folder.parent_id
                && doomed.contains(parent)
            {
                doomed.insert(folder.id.clone());
            }
        }
        if doomed.len() == before {
            break;
        }
    }

    let folders_removed: Vec<String> = folders
        .iter()
        .filter(|f| doomed.contains(&f.id))
        .map(|f| f.id.clone())
        .collect();
    folders.retain(|f| !doomed.contains(&f.id));

    let asset_count = assets.len();
    assets.retain(|a| a.folder_id.as_ref().is_none_or(|id| !doomed.contains(id)));

    CascadeReport {
        folders_removed,
        assets_removed: asset_count - assets.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: &str, parent: Option<&str>) -> AssetFolder {
        AssetFolder {
            id: id.to_string(),
            name: id.to_string(),
            parent_id: parent.map(String::from),
            ..AssetFolder::default()
        }
    }

    fn asset(id: &str, folder: Option<&str>) -> Asset {
        Asset {
            id: id.to_string(),
            folder_id: folder.map(String::from),
            ..Asset::default()
        }
    }

    #[test]
    fn cascade_removes_descendants_and_their_assets() {
        let mut folders = vec![
            folder("sermons", None),
            folder("2024", Some("sermons")),
            folder("easter", Some("2024")),
            folder("logos", None),
        ];
        let mut assets = vec![
            asset("a1", Some("sermons")),
            asset("a2", Some("easter")),
            asset("a3", Some("logos")),
            asset("a4", None),
        ];

        let report = cascade_delete_folder(&mut folders, &mut assets, "sermons");

        assert_eq!(report.folders_removed.len(), 3);
        assert_eq!(report.assets_removed, 2);
        assert_eq!(folders, vec![folder("logos", None)]);
        let remaining: Vec<&str> = assets.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(remaining, vec!["a3", "a4"]);
        assert!(!assets.iter().any(|a| a.folder_id.as_deref() == Some("sermons")));
    }

    #[test]
    fn cascade_on_unknown_folder_is_a_no_op() {
        let mut folders = vec![folder("logos", None)];
        let mut assets = vec![asset("a1", Some("ghost"))];

        let report = cascade_delete_folder(&mut folders, &mut assets, "ghost");

        assert_eq!(report, CascadeReport::default());
        assert_eq!(folders.len(), 1);
        assert_eq!(assets.len(), 1);
    }

    #[test]
    fn mime_classification() {
        assert_eq!(AssetKind::from_mime("image/png"), AssetKind::Image);
        assert_eq!(AssetKind::from_mime("video/mp4"), AssetKind::Video);
        assert_eq!(AssetKind::from_mime("audio/mpeg"), AssetKind::Audio);
        assert_eq!(AssetKind::from_mime("application/pdf"), AssetKind::Document);
    }

    #[test]
    fn root_asset_keeps_explicit_null_folder() {
        let value = serde_json::to_value(asset("a1", None)).unwrap();
        assert!(value["folderId"].is_null());
        assert_eq!(value["type"], "image");
    }
}
