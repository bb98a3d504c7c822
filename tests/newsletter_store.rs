use robosite::error::StoreError;
use robosite::forms::SubscriberStore;
use tempfile::TempDir;

fn open(dir: &TempDir) -> SubscriberStore {
    let path = dir.path().join("subscribers.sqlite");
    let mut store = SubscriberStore::open(path.to_str().unwrap()).unwrap();
    store.init().unwrap();
    store
}

#[test]
fn subscribers_survive_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = open(&dir);
        store.subscribe("ada@club.org").unwrap();
        store.subscribe("  linus@club.org ").unwrap();
    }

    let mut store = open(&dir);
    assert_eq!(store.list().unwrap(), vec!["ada@club.org", "linus@club.org"]);

    match store.subscribe("ada@club.org") {
        Err(StoreError::Invalid(v)) => {
            assert_eq!(v.fields[0].message, "This email is already subscribed");
        }
        other => panic!("expected duplicate rejection, got {:?}", other),
    }
    assert_eq!(store.list().unwrap().len(), 2);
}

#[test]
fn malformed_address_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    assert!(matches!(store.subscribe("ada@club"), Err(StoreError::Invalid(_))));
    assert!(matches!(store.subscribe(""), Err(StoreError::Invalid(_))));
    drop(store);

    let store = open(&dir);
    assert!(store.list().unwrap().is_empty());
}
