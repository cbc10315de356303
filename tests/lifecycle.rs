//! End-to-end walk through the documented workflow: module, document,
//! experiment record, load, bulk delete.

use confman::core::document::Document;
use confman::core::error::ConfmanError;
use confman::core::name::Version;
use confman::core::store::ConfigManager;
use tempfile::tempdir;

fn doc(yaml: &str) -> Document {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn test_full_lifecycle() {
    let tmp = tempdir().unwrap();
    let mgr = ConfigManager::new("riiid", tmp.path()).unwrap();
    let v1 = Version::new(1.0).unwrap();

    mgr.create_module("data").unwrap();
    mgr.create("data", Some("train"), v1, None).unwrap();
    mgr.update("data", Some("train"), v1, &doc("lr: 0.1")).unwrap();

    let record = mgr
        .save_experiment("data", v1, Some("train"), Some("baseline"))
        .unwrap();

    let rows = mgr.show_experiment().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].note.as_deref(), Some("baseline"));

    let loaded = mgr.load_experiment(record.row_id).unwrap();
    assert_eq!(loaded, doc("lr: 0.1"));

    mgr.delete_module("data").unwrap();
    assert!(matches!(
        mgr.get("data", Some("train"), v1),
        Err(ConfmanError::NotFound(_))
    ));
    assert!(mgr.show_experiment().unwrap().is_empty());

    // history kept the whole story: create, update, load-as-get
    let history = mgr.show_history().unwrap();
    assert_eq!(history.len(), 3);
    assert!(history
        .iter()
        .all(|e| e.file_name == "data_train_v1.0.yaml"));
}
