use confman::core::document::Document;
use confman::core::error::ConfmanError;
use confman::core::name::Version;
use confman::core::store::ConfigManager;
use tempfile::tempdir;

fn v(value: f64) -> Version {
    Version::new(value).unwrap()
}

fn doc(yaml: &str) -> Document {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn test_save_requires_existing_document() {
    let tmp = tempdir().unwrap();
    let mgr = ConfigManager::new("riiid", tmp.path()).unwrap();
    assert!(matches!(
        mgr.save_experiment("data", v(1.0), Some("train"), None),
        Err(ConfmanError::NotFound(_))
    ));
    assert!(mgr.show_experiment().unwrap().is_empty());
}

#[test]
fn test_save_and_show_in_row_id_order() {
    let tmp = tempdir().unwrap();
    let mgr = ConfigManager::new("riiid", tmp.path()).unwrap();
    mgr.create("data", Some("train"), v(1.0), None).unwrap();
    mgr.create("data", Some("eval"), v(1.0), None).unwrap();

    let a = mgr
        .save_experiment("data", v(1.0), Some("train"), Some("baseline"))
        .unwrap();
    let b = mgr
        .save_experiment("data", v(1.0), Some("eval"), None)
        .unwrap();
    assert!(b.row_id > a.row_id);

    let rows = mgr.show_experiment().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], a);
    assert_eq!(rows[1], b);
    assert_eq!(rows[0].note.as_deref(), Some("baseline"));
    assert_eq!(rows[0].file_name, "data_train_v1.0.yaml");
    assert_eq!(rows[0].experiment, "train");
}

#[test]
fn test_row_ids_are_stable_across_deletes() {
    let tmp = tempdir().unwrap();
    let mgr = ConfigManager::new("riiid", tmp.path()).unwrap();
    mgr.create("data", Some("train"), v(1.0), None).unwrap();

    let ids: Vec<i64> = (0..3)
        .map(|i| {
            mgr.save_experiment("data", v(1.0), Some("train"), Some(format!("run {}", i).as_str()))
                .unwrap()
                .row_id
        })
        .collect();

    mgr.delete_experiment(ids[1]).unwrap();
    let remaining: Vec<i64> = mgr
        .show_experiment()
        .unwrap()
        .iter()
        .map(|r| r.row_id)
        .collect();
    assert_eq!(remaining, vec![ids[0], ids[2]]);

    // ids strictly grow even after a delete; nothing is renumbered or reused
    let next = mgr
        .save_experiment("data", v(1.0), Some("train"), None)
        .unwrap();
    assert!(next.row_id > ids[2]);
    assert_ne!(next.row_id, ids[1]);
}

#[test]
fn test_load_matches_direct_get() {
    let tmp = tempdir().unwrap();
    let mgr = ConfigManager::new("riiid", tmp.path()).unwrap();
    mgr.create("data", Some("train"), v(1.0), None).unwrap();
    mgr.update("data", Some("train"), v(1.0), &doc("lr: 0.1")).unwrap();

    let rec = mgr
        .save_experiment("data", v(1.0), Some("train"), None)
        .unwrap();
    let loaded = mgr.load_experiment(rec.row_id).unwrap();
    let direct = mgr.get("data", Some("train"), v(1.0)).unwrap();
    assert_eq!(loaded, direct);

    // loading does not mutate the log
    assert_eq!(mgr.show_experiment().unwrap().len(), 1);
}

#[test]
fn test_load_and_delete_reject_unknown_row_ids() {
    let tmp = tempdir().unwrap();
    let mgr = ConfigManager::new("riiid", tmp.path()).unwrap();
    assert!(matches!(
        mgr.load_experiment(7),
        Err(ConfmanError::RowNotFound(7))
    ));
    assert!(matches!(
        mgr.delete_experiment(7),
        Err(ConfmanError::RowNotFound(7))
    ));
}

#[test]
fn test_delete_record_keeps_document() {
    let tmp = tempdir().unwrap();
    let mgr = ConfigManager::new("riiid", tmp.path()).unwrap();
    mgr.create("data", Some("train"), v(1.0), None).unwrap();
    let rec = mgr
        .save_experiment("data", v(1.0), Some("train"), None)
        .unwrap();

    mgr.delete_experiment(rec.row_id).unwrap();
    assert!(mgr.show_experiment().unwrap().is_empty());
    assert!(mgr.get("data", Some("train"), v(1.0)).is_ok());
}

#[test]
fn test_deleting_document_purges_its_records() {
    let tmp = tempdir().unwrap();
    let mgr = ConfigManager::new("riiid", tmp.path()).unwrap();
    mgr.create("data", Some("train"), v(1.0), None).unwrap();
    mgr.create("data", Some("eval"), v(1.0), None).unwrap();
    mgr.save_experiment("data", v(1.0), Some("train"), None).unwrap();
    let kept = mgr
        .save_experiment("data", v(1.0), Some("eval"), None)
        .unwrap();

    mgr.delete("data", Some("train"), v(1.0)).unwrap();
    let rows = mgr.show_experiment().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].row_id, kept.row_id);
}

#[test]
fn test_deleting_module_purges_its_records() {
    let tmp = tempdir().unwrap();
    let mgr = ConfigManager::new("riiid", tmp.path()).unwrap();
    mgr.create("data", Some("train"), v(1.0), None).unwrap();
    mgr.create("model", Some("train"), v(1.0), None).unwrap();
    mgr.save_experiment("data", v(1.0), Some("train"), None).unwrap();
    let kept = mgr
        .save_experiment("model", v(1.0), Some("train"), None)
        .unwrap();

    mgr.delete_module("data").unwrap();
    let rows = mgr.show_experiment().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].row_id, kept.row_id);
}

#[test]
fn test_records_survive_process_restart() {
    let tmp = tempdir().unwrap();
    let row_id = {
        let mgr = ConfigManager::new("riiid", tmp.path()).unwrap();
        mgr.create("data", Some("train"), v(1.0), None).unwrap();
        mgr.save_experiment("data", v(1.0), Some("train"), Some("keep"))
            .unwrap()
            .row_id
    };
    let mgr = ConfigManager::new("riiid", tmp.path()).unwrap();
    let rows = mgr.show_experiment().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].row_id, row_id);
    assert_eq!(rows[0].note.as_deref(), Some("keep"));
}
