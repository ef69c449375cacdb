//! Folder operations of the QBank API.

use crate::folder_tree::{build_tree, FolderForest, FolderNode};
use crate::http_utils::{ApiError, BatchCall, HttpClient, UNKNOWN_ERROR_CODE};
use crate::model::{FolderId, FolderRecord, FolderResponse};
use serde_json::{json, Value};
use tracing::{debug, trace, warn};

/// Deepest folder structure the service returns in one call
pub const MAX_FOLDER_DEPTH: u32 = 23;
/// Id used to address the top of the folder universe
pub const ROOT_FOLDER_ID: FolderId = 0;

#[derive(Clone)]
pub struct FolderApi {
    client: HttpClient,
}

impl FolderApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Fetch the flat folder structure below a folder.
    ///
    /// # Arguments
    /// * `root_folder_id` - Folder to start at, the top of the folder universe if `None`
    /// * `depth` - Number of levels to fetch, all of them if `None`
    /// * `with_properties` - Whether the folders' properties are fetched too
    pub async fn get_folder_records(
        &self,
        root_folder_id: Option<FolderId>,
        depth: Option<u32>,
        with_properties: bool,
    ) -> Result<Vec<FolderRecord>, ApiError> {
        let mut result = self
            .client
            .call(
                "getfolderstructure",
                structure_arguments(root_folder_id, depth, with_properties),
            )
            .await?;
        let records = folder_records(&mut result)?;
        debug!("Fetched {} folders", records.len());
        Ok(records)
    }

    /// Fetch the folder structure below a folder, with properties, as a forest
    pub async fn get_folder_tree(
        &self,
        root_folder_id: Option<FolderId>,
        depth: Option<u32>,
    ) -> Result<FolderForest, ApiError> {
        let records = self.get_folder_records(root_folder_id, depth, true).await?;
        Ok(build_tree(records)?)
    }

    pub async fn get_folder(&self, folder_id: FolderId) -> Result<FolderRecord, ApiError> {
        let mut result = self
            .client
            .call("getfolderinformation", json!({ "folderId": folder_id }))
            .await?;
        folder_record(&mut result)
    }

    /// Fetch a folder together with everything below it
    pub async fn get_folder_with_subtree(
        &self,
        folder_id: FolderId,
        with_properties: bool,
    ) -> Result<FolderNode, ApiError> {
        let calls = vec![
            BatchCall::new(
                "subfolders",
                "getfolderstructure",
                structure_arguments(Some(folder_id), None, with_properties),
            ),
            BatchCall::new(
                "folder",
                "getfolderinformation",
                json!({ "folderId": folder_id }),
            ),
        ];
        let mut results = self.client.batch(calls).await?;

        let folder = folder_record(&mut results.take("folder")?)?;
        let mut records: Vec<FolderRecord> = folder_records(&mut results.take("subfolders")?)?
            .into_iter()
            .filter(|record| record.id() != folder_id)
            .collect();
        trace!("Folder {} has {} folders below it", folder_id, records.len());
        records.push(folder);

        let forest = build_tree(records)?;
        forest.into_roots().remove(&folder_id).ok_or_else(|| {
            ApiError::UnexpectedResponse(format!(
                "folder {} is not at the top of its own structure",
                folder_id
            ))
        })
    }

    /// Create a folder, below the top of the folder universe if no parent is given
    pub async fn create_folder(
        &self,
        name: &str,
        parent_folder_id: Option<FolderId>,
    ) -> Result<FolderRecord, ApiError> {
        let calls = vec![
            BatchCall::new(
                "creation",
                "createfolder",
                json!({
                    "name": name,
                    "parentId": parent_folder_id.unwrap_or(ROOT_FOLDER_ID),
                }),
            ),
            BatchCall::new(
                "folder",
                "getfolderinformation",
                json!({ "folderId": "$creation.folderId" }),
            ),
        ];
        let mut results = self.client.batch(calls).await?;

        results.take("creation")?;
        let folder = folder_record(&mut results.take("folder")?)?;
        debug!("Created folder {} ({})", folder.name(), folder.id());
        Ok(folder)
    }

    pub async fn rename_folder(
        &self,
        folder_id: FolderId,
        name: &str,
    ) -> Result<FolderRecord, ApiError> {
        let calls = vec![
            BatchCall::new(
                "edit",
                "editfolder",
                json!({ "folderId": folder_id, "name": name }),
            ),
            BatchCall::new(
                "folder",
                "getfolderinformation",
                json!({ "folderId": folder_id }),
            ),
        ];
        let mut results = self.client.batch(calls).await?;

        results.take("edit")?;
        folder_record(&mut results.take("folder")?)
    }

    /// Delete a folder.
    ///
    /// Returns `false` if the service refused to delete it. Connection
    /// problems are still errors.
    pub async fn delete_folder(&self, folder_id: FolderId) -> Result<bool, ApiError> {
        match self
            .client
            .call("deleteFolder", json!({ "folderId": folder_id }))
            .await
        {
            Ok(_) => Ok(true),
            Err(ApiError::Communication { message, code, .. }) => {
                warn!(
                    "Folder {} was not deleted: {} (code {})",
                    folder_id, message, code
                );
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn add_object_to_folder(
        &self,
        folder_id: FolderId,
        object_id: u32,
    ) -> Result<bool, ApiError> {
        self.object_call("addobjectTofolder", folder_id, object_id)
            .await
    }

    pub async fn remove_object_from_folder(
        &self,
        folder_id: FolderId,
        object_id: u32,
    ) -> Result<bool, ApiError> {
        self.object_call("removeobjectfromfolder", folder_id, object_id)
            .await
    }

    // The service reports an object that could not be moved with the unknown error code
    async fn object_call(
        &self,
        function: &str,
        folder_id: FolderId,
        object_id: u32,
    ) -> Result<bool, ApiError> {
        let arguments = json!({ "folderId": folder_id, "objectId": object_id });
        match self.client.call(function, arguments).await {
            Ok(_) => Ok(true),
            Err(e) if e.code() == Some(UNKNOWN_ERROR_CODE) => {
                debug!("{} failed for object {}: {}", function, object_id, e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

fn structure_arguments(
    root_folder_id: Option<FolderId>,
    depth: Option<u32>,
    with_properties: bool,
) -> Value {
    json!({
        "folderId": root_folder_id.unwrap_or(ROOT_FOLDER_ID),
        "depth": depth.unwrap_or(MAX_FOLDER_DEPTH),
        "fetchProperties": with_properties,
    })
}

/// Folders in the `data` array of a structure response, none if there is no array
fn folder_records(result: &mut Value) -> Result<Vec<FolderRecord>, ApiError> {
    match result.get_mut("data").map(Value::take) {
        Some(Value::Array(folders)) => folders
            .into_iter()
            .map(|folder| -> Result<FolderRecord, ApiError> {
                let response: FolderResponse = serde_json::from_value(folder)?;
                Ok(FolderRecord::try_from(response)?)
            })
            .collect(),
        _ => Ok(Vec::new()),
    }
}

fn folder_record(result: &mut Value) -> Result<FolderRecord, ApiError> {
    let folder = result
        .get_mut("folder")
        .map(Value::take)
        .filter(Value::is_object)
        .ok_or_else(|| ApiError::UnexpectedResponse("response has no folder".to_string()))?;
    let response: FolderResponse = serde_json::from_value(folder)?;
    Ok(FolderRecord::try_from(response)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_arguments_defaults() {
        assert_eq!(
            json!({"folderId": 0, "depth": 23, "fetchProperties": false}),
            structure_arguments(None, None, false)
        );
        assert_eq!(
            json!({"folderId": 12, "depth": 2, "fetchProperties": true}),
            structure_arguments(Some(12), Some(2), true)
        );
    }

    #[test]
    fn test_folder_records_from_data() {
        let mut result = json!({
            "success": true,
            "data": [
                {"folderId": 1, "name": "Root", "tree": "1", "owner": 4},
                {"folderId": 26, "name": "Child", "tree": "1-1a", "owner": 4}
            ]
        });
        let records = folder_records(&mut result).unwrap();
        assert_eq!(2, records.len());
        assert_eq!(26, records[1].id());
        assert_eq!(1, records[1].parent_id());
        assert_eq!(4, records[1].owner_id());
    }

    #[test]
    fn test_folder_records_without_data() {
        let mut result = json!({"success": true, "data": null});
        assert!(folder_records(&mut result).unwrap().is_empty());
    }

    #[test]
    fn test_folder_record_with_bad_tree() {
        let mut result = json!({"success": true, "folder": {"name": "Bad", "tree": "1-zz"}});
        assert!(matches!(
            folder_record(&mut result),
            Err(ApiError::ModelError(_))
        ));

        let mut result = json!({"success": true});
        assert!(matches!(
            folder_record(&mut result),
            Err(ApiError::UnexpectedResponse(_))
        ));
    }
}
