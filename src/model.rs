use crate::folder_tree::FolderTreeError;
use crate::format::{CsvRecordProducer, FormattingError, OutputFormat, OutputFormatter};
use crate::property::{Property, PropertyError, RawProperty};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a folder in the folder universe
pub type FolderId = u32;

/// Separator between ids in a tree string
pub const TREE_DELIMITER: char = '-';

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("missing property value {name:?}")]
    MissingPropertyValue { name: String },
    #[error("{0}")]
    FolderTreeError(#[from] FolderTreeError),
    #[error("{0}")]
    PropertyError(#[from] PropertyError),
}

/// A folder's place in the folder universe.
///
/// On the wire this is a hyphen-delimited list of hexadecimal ids, from some
/// ancestor down to and including the folder itself (e.g. `"1-1a-2f"`).
/// Empty segments left by stray delimiters are ignored.
///
/// Paths order the way folders have to be placed in a tree: ids are compared
/// position by position, and an ancestor sorts before all of its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreePath(Vec<FolderId>);

impl TreePath {
    pub fn new(segments: Vec<FolderId>) -> Result<TreePath, FolderTreeError> {
        if segments.is_empty() {
            return Err(FolderTreeError::MalformedPath {
                tree: String::new(),
            });
        }
        Ok(TreePath(segments))
    }

    pub fn segments(&self) -> &[FolderId] {
        &self.0
    }

    /// Number of ids in the path
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: a tree path holds at least the folder's own id
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The folder's own id
    pub fn id(&self) -> FolderId {
        self.0.last().copied().unwrap_or_default()
    }

    /// The direct parent's id, or 0 for a single-id path
    pub fn parent_id(&self) -> FolderId {
        if self.0.len() < 2 {
            return 0;
        }
        self.0[self.0.len() - 2]
    }

    /// Path of the direct parent, if the path names one
    pub fn parent(&self) -> Option<TreePath> {
        if self.0.len() < 2 {
            return None;
        }
        Some(TreePath(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Whether `self` names an ancestor of the folder at `other`
    pub fn is_ancestor_of(&self, other: &TreePath) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }
}

impl FromStr for TreePath {
    type Err = FolderTreeError;

    fn from_str(tree: &str) -> Result<TreePath, FolderTreeError> {
        let malformed = || FolderTreeError::MalformedPath {
            tree: tree.to_string(),
        };

        let segments = tree
            .split(TREE_DELIMITER)
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                if !segment.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(malformed());
                }
                FolderId::from_str_radix(segment, 16).map_err(|_| malformed())
            })
            .collect::<Result<Vec<FolderId>, FolderTreeError>>()?;

        if segments.is_empty() {
            return Err(malformed());
        }
        Ok(TreePath(segments))
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let segments: Vec<String> = self.0.iter().map(|id| format!("{:x}", id)).collect();
        write!(f, "{}", segments.join("-"))
    }
}

impl Serialize for TreePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TreePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tree = String::deserialize(deserializer)?;
        tree.parse().map_err(serde::de::Error::custom)
    }
}

/// A folder as returned by the service, with its id and parent derived from its tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderRecord {
    id: FolderId,
    #[serde(rename = "parentId")]
    parent_id: FolderId,
    name: String,
    tree: TreePath,
    #[serde(rename = "ownerId")]
    owner_id: u32,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<BTreeMap<String, Property>>,
}

impl FolderRecord {
    pub fn new(name: String, tree: TreePath) -> FolderRecord {
        FolderRecord {
            id: tree.id(),
            parent_id: tree.parent_id(),
            name,
            tree,
            owner_id: 0,
            created_at: None,
            updated_at: None,
            properties: None,
        }
    }

    pub fn builder() -> FolderRecordBuilder {
        FolderRecordBuilder::new()
    }

    pub fn id(&self) -> FolderId {
        self.id
    }

    pub fn parent_id(&self) -> FolderId {
        self.parent_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tree(&self) -> &TreePath {
        &self.tree
    }

    pub fn owner_id(&self) -> u32 {
        self.owner_id
    }

    pub fn created_at(&self) -> Option<&String> {
        self.created_at.as_ref()
    }

    pub fn updated_at(&self) -> Option<&String> {
        self.updated_at.as_ref()
    }

    /// Properties keyed by system name; `None` when fetched without properties
    pub fn properties(&self) -> Option<&BTreeMap<String, Property>> {
        self.properties.as_ref()
    }

    pub fn property(&self, system_name: &str) -> Option<&Property> {
        self.properties.as_ref()?.get(system_name)
    }

    /// Look up a property by its numeric id
    pub fn property_by_id(&self, id: u32) -> Option<&Property> {
        self.properties
            .as_ref()?
            .values()
            .find(|property| property.id() == id)
    }
}

pub struct FolderRecordBuilder {
    name: Option<String>,
    tree: Option<String>,
    owner_id: u32,
    created_at: Option<String>,
    updated_at: Option<String>,
    properties: Option<Vec<Property>>,
}

impl FolderRecordBuilder {
    fn new() -> FolderRecordBuilder {
        FolderRecordBuilder {
            name: None,
            tree: None,
            owner_id: 0,
            created_at: None,
            updated_at: None,
            properties: None,
        }
    }

    pub fn name(&mut self, name: &str) -> &mut FolderRecordBuilder {
        self.name = Some(name.to_string());
        self
    }

    pub fn tree(&mut self, tree: &str) -> &mut FolderRecordBuilder {
        self.tree = Some(tree.to_string());
        self
    }

    pub fn owner_id(&mut self, owner_id: u32) -> &mut FolderRecordBuilder {
        self.owner_id = owner_id;
        self
    }

    pub fn created_at(&mut self, created_at: String) -> &mut FolderRecordBuilder {
        self.created_at = Some(created_at);
        self
    }

    pub fn updated_at(&mut self, updated_at: String) -> &mut FolderRecordBuilder {
        self.updated_at = Some(updated_at);
        self
    }

    pub fn properties(&mut self, properties: Vec<Property>) -> &mut FolderRecordBuilder {
        self.properties = Some(properties);
        self
    }

    pub fn build(&self) -> Result<FolderRecord, ModelError> {
        let name = match &self.name {
            Some(name) => name.clone(),
            None => {
                return Err(ModelError::MissingPropertyValue {
                    name: "name".to_string(),
                })
            }
        };

        let tree: TreePath = match &self.tree {
            Some(tree) => tree.parse()?,
            None => {
                return Err(ModelError::MissingPropertyValue {
                    name: "tree".to_string(),
                })
            }
        };

        let mut folder = FolderRecord::new(name, tree);
        folder.owner_id = self.owner_id;
        folder.created_at = self.created_at.clone();
        folder.updated_at = self.updated_at.clone();
        folder.properties = self.properties.as_ref().map(|properties| {
            properties
                .iter()
                .map(|property| (property.system_name().to_string(), property.clone()))
                .collect()
        });
        Ok(folder)
    }
}

// Folder models for the QBank API

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderResponse {
    #[serde(rename = "folderId", default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<FolderId>,
    pub name: String,
    pub tree: String,
    #[serde(default)]
    pub owner: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<RawProperty>>,
}

impl TryFrom<FolderResponse> for FolderRecord {
    type Error = ModelError;

    fn try_from(response: FolderResponse) -> Result<Self, Self::Error> {
        let mut builder = FolderRecord::builder();
        builder
            .name(&response.name)
            .tree(&response.tree)
            .owner_id(response.owner);
        if let Some(created) = response.created {
            builder.created_at(created);
        }
        if let Some(updated) = response.updated {
            builder.updated_at(updated);
        }
        if let Some(raw_properties) = &response.properties {
            let properties = raw_properties
                .iter()
                .map(Property::from_raw)
                .collect::<Result<Vec<Property>, PropertyError>>()?;
            builder.properties(properties);
        }
        builder.build()
    }
}

/// One row of a flat folder listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderSummary {
    id: FolderId,
    #[serde(rename = "parentId")]
    parent_id: FolderId,
    name: String,
    path: String,
    tree: String,
}

impl FolderSummary {
    pub fn new(folder: &FolderRecord, path: String) -> FolderSummary {
        FolderSummary {
            id: folder.id(),
            parent_id: folder.parent_id(),
            name: folder.name().to_string(),
            path,
            tree: folder.tree().to_string(),
        }
    }

    pub fn id(&self) -> FolderId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Folder names from the local root down to this folder, joined by `/`
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl CsvRecordProducer for FolderSummary {
    fn csv_header() -> Vec<String> {
        vec![
            "ID".to_string(),
            "PARENT_ID".to_string(),
            "NAME".to_string(),
            "PATH".to_string(),
        ]
    }

    fn as_csv_records(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.id.to_string(),
            self.parent_id.to_string(),
            self.name.clone(),
            self.path.clone(),
        ]]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FolderList {
    folders: Vec<FolderSummary>,
}

impl FolderList {
    pub fn empty() -> FolderList {
        FolderList {
            folders: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn insert(&mut self, folder: FolderSummary) {
        self.folders.push(folder);
    }

    pub fn iter(&self) -> impl Iterator<Item = &FolderSummary> {
        self.folders.iter()
    }

    fn sorted_by_path(&self) -> Vec<&FolderSummary> {
        let mut folders: Vec<&FolderSummary> = self.folders.iter().collect();
        folders.sort_by(|a, b| a.path.cmp(&b.path));
        folders
    }
}

impl FromIterator<FolderSummary> for FolderList {
    fn from_iter<I: IntoIterator<Item = FolderSummary>>(iter: I) -> FolderList {
        FolderList {
            folders: iter.into_iter().collect(),
        }
    }
}

impl CsvRecordProducer for FolderList {
    fn csv_header() -> Vec<String> {
        FolderSummary::csv_header()
    }

    fn as_csv_records(&self) -> Vec<Vec<String>> {
        self.sorted_by_path()
            .into_iter()
            .flat_map(|folder| folder.as_csv_records())
            .collect()
    }
}

impl OutputFormatter for FolderList {
    fn format(&self, format: &OutputFormat) -> Result<String, FormattingError> {
        match format {
            OutputFormat::Json(options) => {
                let folders = self.sorted_by_path();
                if options.pretty {
                    Ok(serde_json::to_string_pretty(&folders)?)
                } else {
                    Ok(serde_json::to_string(&folders)?)
                }
            }
            OutputFormat::Csv(options) => self.to_csv(options.with_headers),
            // Tree output needs the hierarchy, see FolderForest
            OutputFormat::Tree(_) => Err(FormattingError::UnsupportedOutputFormat(
                format.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormatOptions;

    #[test]
    fn test_tree_path_parsing() {
        let tree: TreePath = "1-1a-ff".parse().unwrap();
        assert_eq!(&[1, 26, 255], tree.segments());
        assert_eq!(255, tree.id());
        assert_eq!(26, tree.parent_id());
        assert_eq!("1-1a-ff", tree.to_string());

        let tree: TreePath = "-2-".parse().unwrap();
        assert_eq!(&[2], tree.segments());
        assert_eq!(0, tree.parent_id());
        assert!(tree.parent().is_none());

        let tree: TreePath = "A-B".parse().unwrap();
        assert_eq!(&[10, 11], tree.segments());
    }

    #[test]
    fn test_malformed_tree_paths() {
        for tree in ["", "-", "--", "1-x", "1-+2", "fffffffff"] {
            assert_eq!(
                Err(FolderTreeError::MalformedPath {
                    tree: tree.to_string()
                }),
                tree.parse::<TreePath>(),
                "tree {:?}",
                tree
            );
        }
    }

    #[test]
    fn test_tree_path_ordering() {
        let path = |tree: &str| tree.parse::<TreePath>().unwrap();

        assert!(path("1") < path("1-2"));
        assert!(path("1-2") < path("1-2-3"));
        assert!(path("1-2-3") < path("1-3"));
        assert!(path("2") > path("1-f"));
        assert!(path("a") > path("9"));
        assert_eq!(std::cmp::Ordering::Equal, path("1-2").cmp(&path("-1-2")));

        assert!(path("1").is_ancestor_of(&path("1-2-3")));
        assert!(!path("1-2").is_ancestor_of(&path("1-2")));
        assert!(!path("2").is_ancestor_of(&path("1-2")));
    }

    #[test]
    fn test_folder_record_builder() {
        let folder = FolderRecord::builder()
            .name("Images")
            .tree("1-2a")
            .owner_id(7)
            .created_at("2011-03-01 10:00:00".to_string())
            .build()
            .unwrap();

        assert_eq!(42, folder.id());
        assert_eq!(1, folder.parent_id());
        assert_eq!("Images", folder.name());
        assert_eq!(7, folder.owner_id());
        assert_eq!(Some(&"2011-03-01 10:00:00".to_string()), folder.created_at());
        assert!(folder.updated_at().is_none());
        assert!(folder.properties().is_none());
    }

    #[test]
    fn test_folder_record_builder_requires_name_and_tree() {
        assert!(matches!(
            FolderRecord::builder().tree("1").build(),
            Err(ModelError::MissingPropertyValue { .. })
        ));
        assert!(matches!(
            FolderRecord::builder().name("x").build(),
            Err(ModelError::MissingPropertyValue { .. })
        ));
        assert!(matches!(
            FolderRecord::builder().name("x").tree("").build(),
            Err(ModelError::FolderTreeError(FolderTreeError::MalformedPath { .. }))
        ));
    }

    #[test]
    fn test_folder_response_conversion() {
        let json = r#"{
            "folderId": 3,
            "name": "Logos",
            "tree": "1-3",
            "owner": 12,
            "created": "2012-01-01 12:00:00",
            "updated": "2012-02-01 12:00:00",
            "properties": [
                {"propertyId": 5, "id": 9, "propertyName": "system_color", "title": "Color",
                 "value": "red", "defaultValue": "", "propertyType": "str"}
            ]
        }"#;
        let response: FolderResponse = serde_json::from_str(json).unwrap();
        let folder = FolderRecord::try_from(response).unwrap();

        assert_eq!(3, folder.id());
        assert_eq!(1, folder.parent_id());
        assert_eq!(12, folder.owner_id());
        assert_eq!("Color", folder.property("system_color").unwrap().title());
        assert_eq!("system_color", folder.property_by_id(5).unwrap().system_name());
    }

    #[test]
    fn test_folder_response_with_bad_tree() {
        let response = FolderResponse {
            folder_id: None,
            name: "Broken".to_string(),
            tree: "1-zz".to_string(),
            owner: 0,
            created: None,
            updated: None,
            properties: None,
        };
        assert!(matches!(
            FolderRecord::try_from(response),
            Err(ModelError::FolderTreeError(FolderTreeError::MalformedPath { .. }))
        ));
    }

    #[test]
    fn test_folder_list_output_format() {
        let root = FolderRecord::builder().name("Root").tree("1").build().unwrap();
        let child = FolderRecord::builder().name("Child").tree("1-2").build().unwrap();
        let list: FolderList = vec![
            FolderSummary::new(&child, "Root/Child".to_string()),
            FolderSummary::new(&root, "Root".to_string()),
        ]
        .into_iter()
        .collect();

        let options = OutputFormatOptions {
            with_headers: true,
            pretty: false,
        };
        let csv = list.format(&OutputFormat::Csv(options.clone())).unwrap();
        assert_eq!("ID,PARENT_ID,NAME,PATH\n1,0,Root,Root\n2,1,Child,Root/Child\n", csv);

        let json = list.format(&OutputFormat::Json(options.clone())).unwrap();
        assert_eq!(
            r#"[{"id":1,"parentId":0,"name":"Root","path":"Root","tree":"1"},{"id":2,"parentId":1,"name":"Child","path":"Root/Child","tree":"1-2"}]"#,
            json
        );

        assert!(list.format(&OutputFormat::Tree(options)).is_err());
    }
}
