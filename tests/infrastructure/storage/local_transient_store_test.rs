use tunecourier::application::ports::TransientStore;
use tunecourier::infrastructure::storage::LocalTransientStore;

fn create_test_store() -> (tempfile::TempDir, LocalTransientStore) {
    let dir = tempfile::TempDir::new().unwrap();
    let store = LocalTransientStore::new(dir.path().join("downloads"));
    (dir, store)
}

#[tokio::test]
async fn given_missing_directory_when_preparing_then_directory_is_created() {
    let (_dir, store) = create_test_store();

    store.prepare().await.unwrap();

    assert!(store.root().is_dir());
}

#[tokio::test]
async fn given_prepared_directory_when_preparing_again_then_succeeds() {
    let (_dir, store) = create_test_store();

    store.prepare().await.unwrap();
    store.prepare().await.unwrap();
}

#[tokio::test]
async fn given_existing_file_when_removing_then_file_is_gone() {
    let (_dir, store) = create_test_store();
    store.prepare().await.unwrap();
    let path = store.root().join("v1.mp3");
    std::fs::write(&path, b"audio").unwrap();

    let removed = store.remove(&path).await.unwrap();

    assert!(removed);
    assert!(!path.exists());
}

#[tokio::test]
async fn given_removed_file_when_removing_twice_then_second_call_is_noop() {
    let (_dir, store) = create_test_store();
    store.prepare().await.unwrap();
    let path = store.root().join("v1.mp3");
    std::fs::write(&path, b"audio").unwrap();

    assert!(store.remove(&path).await.unwrap());
    assert!(!store.remove(&path).await.unwrap());
}

#[tokio::test]
async fn given_never_created_file_when_removing_then_returns_false() {
    let (_dir, store) = create_test_store();
    store.prepare().await.unwrap();

    let removed = store.remove(&store.root().join("ghost.mp3")).await.unwrap();

    assert!(!removed);
}
