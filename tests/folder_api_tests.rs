use mockito::{Matcher, Server, ServerGuard};
use qbank::folder_api::FolderApi;
use qbank::http_utils::{ApiError, HttpClient, HttpRequestConfig};
use qbank::property::PropertyValue;
use serde_json::json;

fn folder_api(server: &ServerGuard, session_hash: Option<&str>) -> FolderApi {
    let config = HttpRequestConfig {
        api_address: server.url(),
        qbank_address: "demo".to_string(),
        timeout: 5,
        session_hash: session_hash.map(str::to_string),
        user_agent: "qbank-tests".to_string(),
    };
    FolderApi::new(HttpClient::new(config).unwrap())
}

// Fragment of the url-encoded `data` form field
fn data_contains(fragment: &str) -> Matcher {
    Matcher::Regex(regex_escape(fragment))
}

fn regex_escape(fragment: &str) -> String {
    fragment
        .chars()
        .flat_map(|c| match c {
            '.' | '$' | '+' | '*' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^' | '\\' => {
                vec!['\\', c]
            }
            c => vec![c],
        })
        .collect()
}

#[tokio::test]
async fn test_get_folder_tree_rebuilds_hierarchy() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/demo/getfolderstructure")
        .match_body(Matcher::AllOf(vec![
            data_contains("%22folderId%22%3A0"),
            data_contains("%22depth%22%3A23"),
            data_contains("%22fetchProperties%22%3Atrue"),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "data": [
                    {"folderId": 43, "name": "Deep", "tree": "1-1a-2b", "owner": 4, "properties": []},
                    {"folderId": 2, "name": "Other", "tree": "2", "owner": 4, "properties": []},
                    {"folderId": 1, "name": "Root", "tree": "1", "owner": 4, "created": "2011-03-01 10:00:00",
                     "properties": [{"propertyId": 5, "id": 9, "propertyName": "system_color",
                                     "title": "Color", "value": "red", "propertyType": "str"}]},
                    {"folderId": 26, "name": "Alpha", "tree": "1-1a", "owner": 4, "properties": []}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let forest = folder_api(&server, None)
        .get_folder_tree(None, None)
        .await
        .unwrap();
    mock.assert_async().await;

    assert_eq!(vec![1, 2], forest.roots().keys().copied().collect::<Vec<u32>>());
    assert_eq!(4, forest.len());

    let root = forest.get(1).unwrap();
    assert_eq!(
        Some(&PropertyValue::Text("red".to_string())),
        root.folder().property("system_color").unwrap().value()
    );
    assert_eq!(Some(&"2011-03-01 10:00:00".to_string()), root.folder().created_at());

    let alpha = root.child(26).unwrap();
    assert_eq!("Alpha", alpha.name());
    assert_eq!(26, alpha.child(43).unwrap().parent_id());
    assert_eq!("Deep", forest.find_by_name_path("Root/Alpha/Deep").unwrap().name());
}

#[tokio::test]
async fn test_get_folder_tree_reports_broken_structure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/demo/getfolderstructure")
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "data": [
                    {"folderId": 1, "name": "Root", "tree": "1"},
                    {"folderId": 3, "name": "Orphan", "tree": "1-2-3"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let result = folder_api(&server, None).get_folder_tree(None, None).await;
    assert!(matches!(result, Err(ApiError::FolderTreeError(_))));
}

#[tokio::test]
async fn test_session_hash_is_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/demo/getfolderstructure")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            data_contains("%22hash%22%3A%22sessionhash%22"),
            data_contains("%22folderId%22%3A12"),
            data_contains("%22depth%22%3A2"),
        ]))
        .with_status(200)
        .with_body(json!({"success": true, "data": []}).to_string())
        .create_async()
        .await;

    let records = folder_api(&server, Some("sessionhash"))
        .get_folder_records(Some(12), Some(2), false)
        .await
        .unwrap();
    mock.assert_async().await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_service_error_is_reported() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/demo/getfolderinformation")
        .with_status(200)
        .with_body(
            json!({
                "success": false,
                "error": {"message": "Folder does not exist", "code": 12, "type": "FolderException"}
            })
            .to_string(),
        )
        .create_async()
        .await;

    match folder_api(&server, None).get_folder(77).await {
        Err(ApiError::Communication {
            message,
            code,
            kind,
        }) => {
            assert_eq!("Folder does not exist", message);
            assert_eq!(12, code);
            assert_eq!("FolderException", kind);
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[tokio::test]
async fn test_unsuccessful_call_without_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/demo/getfolderinformation")
        .with_status(200)
        .with_body(json!({"success": false}).to_string())
        .create_async()
        .await;

    let error = folder_api(&server, None).get_folder(77).await.unwrap_err();
    assert_eq!(Some(99), error.code());
}

#[tokio::test]
async fn test_http_failure_is_reported() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/demo/getfolderinformation")
        .with_status(500)
        .create_async()
        .await;

    let result = folder_api(&server, None).get_folder(77).await;
    assert!(matches!(result, Err(ApiError::HttpError(_))));
}

#[tokio::test]
async fn test_create_folder_in_batch() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/demo/batch")
        .match_body(Matcher::AllOf(vec![
            data_contains("%22function%22%3A%22createfolder%22"),
            data_contains("%22parentId%22%3A1"),
            data_contains("%22%24creation.folderId%22"),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "results": {
                    "creation": {"success": true, "folderId": 27},
                    "folder": {"success": true, "folder": {"folderId": 27, "name": "Reports", "tree": "1-1b", "owner": 4}}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let folder = folder_api(&server, None)
        .create_folder("Reports", Some(1))
        .await
        .unwrap();
    mock.assert_async().await;

    assert_eq!(27, folder.id());
    assert_eq!(1, folder.parent_id());
    assert_eq!("Reports", folder.name());
}

#[tokio::test]
async fn test_failed_batch_call_is_reported() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/demo/batch")
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "results": {
                    "edit": {"success": false, "error": {"message": "Access denied", "code": 3, "type": "AccessException"}},
                    "folder": {"success": true, "folder": {"folderId": 26, "name": "Alpha", "tree": "1-1a"}}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let error = folder_api(&server, None)
        .rename_folder(26, "Beta")
        .await
        .unwrap_err();
    assert_eq!(Some(3), error.code());
}

#[tokio::test]
async fn test_get_folder_with_subtree() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/demo/batch")
        .match_body(Matcher::AllOf(vec![
            data_contains("%22name%22%3A%22subfolders%22"),
            data_contains("%22name%22%3A%22folder%22"),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "results": {
                    "subfolders": {"success": true, "data": [
                        {"folderId": 43, "name": "Deep", "tree": "1-1a-2b"},
                        {"folderId": 26, "name": "Alpha", "tree": "1-1a"},
                        {"folderId": 44, "name": "Wide", "tree": "1-1a-2c"}
                    ]},
                    "folder": {"success": true, "folder": {"folderId": 26, "name": "Alpha", "tree": "1-1a"}}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let node = folder_api(&server, None)
        .get_folder_with_subtree(26, false)
        .await
        .unwrap();

    assert_eq!(26, node.id());
    assert_eq!(vec![43, 44], node.children().keys().copied().collect::<Vec<u32>>());
    assert_eq!(2, node.descendant_count());
}

#[tokio::test]
async fn test_delete_folder() {
    let mut server = Server::new_async().await;
    let _deleted = server
        .mock("POST", "/demo/deleteFolder")
        .match_body(data_contains("%22folderId%22%3A26"))
        .with_status(200)
        .with_body(json!({"success": true}).to_string())
        .create_async()
        .await;
    let _refused = server
        .mock("POST", "/demo/deleteFolder")
        .match_body(data_contains("%22folderId%22%3A1%7D"))
        .with_status(200)
        .with_body(
            json!({"success": false, "error": {"message": "Folder is not empty", "code": 7, "type": "FolderException"}})
                .to_string(),
        )
        .create_async()
        .await;

    let api = folder_api(&server, None);
    assert!(api.delete_folder(26).await.unwrap());
    assert!(!api.delete_folder(1).await.unwrap());
}

#[tokio::test]
async fn test_object_calls_map_unknown_error_to_false() {
    let mut server = Server::new_async().await;
    let _added = server
        .mock("POST", "/demo/addobjectTofolder")
        .with_status(200)
        .with_body(json!({"success": false}).to_string())
        .create_async()
        .await;
    let _removed = server
        .mock("POST", "/demo/removeobjectfromfolder")
        .with_status(200)
        .with_body(
            json!({"success": false, "error": {"message": "Access denied", "code": 3, "type": "AccessException"}})
                .to_string(),
        )
        .create_async()
        .await;

    let api = folder_api(&server, None);
    assert!(!api.add_object_to_folder(26, 1001).await.unwrap());
    assert_eq!(
        Some(3),
        api.remove_object_from_folder(26, 1001)
            .await
            .unwrap_err()
            .code()
    );
}
