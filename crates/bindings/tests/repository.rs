//! Repository behavior over the in-memory store.

use std::sync::Arc;

use bindings::{
    BindingRepository, KeyBinding, KeyValueStore, MemoryStore, StoreError,
};
use elements::{ElementType, SelectorDescriptor};
use serde_json::json;

fn binding(id: &str, domain: &str) -> KeyBinding {
    KeyBinding {
        id: id.into(),
        domain: domain.into(),
        url: String::new(),
        element_type: ElementType::Button,
        selector: SelectorDescriptor {
            css_path: format!("#{id}"),
            xpath: format!("//*[@id=\"{id}\"]"),
            text_content: id.into(),
            index: Some(0),
        },
        key: "Ctrl+K".into(),
        description: id.into(),
        ignore_input_focus: false,
        enabled: true,
        created_at: 1,
    }
}

fn repo() -> (Arc<MemoryStore>, BindingRepository) {
    let store = MemoryStore::shared(None);
    (store.clone(), BindingRepository::new(store))
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    let (_, repo) = repo();
    assert!(repo.list().await.expect("list").is_empty());
    repo.initialize().await.expect("init");
    assert!(repo.list().await.expect("list").is_empty());
}

#[tokio::test]
async fn save_appends_then_replaces_in_place() {
    let (_, repo) = repo();
    assert!(!repo.save(binding("a", "x.test")).await.expect("save"));
    assert!(!repo.save(binding("b", "y.test")).await.expect("save"));
    let mut edited = binding("a", "x.test");
    edited.description = "edited".into();
    assert!(repo.save(edited).await.expect("save"));

    let all = repo.list().await.expect("list");
    let ids: Vec<&str> = all.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(all[0].description, "edited");
}

#[tokio::test]
async fn delete_removes_exactly_one() {
    let (_, repo) = repo();
    let originals: Vec<KeyBinding> = ["a", "b", "c"]
        .into_iter()
        .zip(10..)
        .map(|(id, created_at)| KeyBinding {
            created_at,
            key: format!("Ctrl+{}", id.to_uppercase()),
            ..binding(id, "x.test")
        })
        .collect();
    for b in &originals {
        repo.save(b.clone()).await.expect("save");
    }
    assert!(repo.delete("b").await.expect("delete"));
    assert!(!repo.delete("b").await.expect("delete"));
    let left = repo.list().await.expect("list");
    assert_eq!(left, vec![originals[0].clone(), originals[2].clone()]);
}

#[tokio::test]
async fn domain_filter_and_toggle() {
    let (_, repo) = repo();
    repo.save(binding("a", "x.test")).await.expect("save");
    repo.save(binding("b", "y.test")).await.expect("save");
    let x = repo.list_for_domain(Some("x.test")).await.expect("list");
    assert_eq!(x.len(), 1);
    assert_eq!(repo.list_for_domain(None).await.expect("list").len(), 2);

    repo.set_enabled("b", false).await.expect("toggle");
    assert!(!repo.find("b").await.expect("find").expect("present").enabled);
    assert_eq!(
        repo.set_enabled("zzz", true).await,
        Err(StoreError::NotFound("zzz".into()))
    );
}

#[tokio::test]
async fn writes_are_observable_and_camel_case() {
    let (store, repo) = repo();
    let mut rx = store.subscribe();
    repo.save(binding("a", "x.test")).await.expect("save");
    let change = rx.recv().await.expect("change");
    assert_eq!(change.key, "bindings");
    let stored = change.new_value.expect("value");
    assert_eq!(stored[0]["elementType"], "button");
    assert_eq!(stored[0]["selector"]["cssPath"], "#a");
}

#[tokio::test]
async fn malformed_collection_is_reported() {
    let (store, repo) = repo();
    store
        .set("bindings", json!({"not": "an array"}))
        .await
        .expect("set");
    assert!(matches!(
        repo.list().await,
        Err(StoreError::Malformed { .. })
    ));
}

#[tokio::test]
async fn quota_violation_surfaces() {
    let store = MemoryStore::shared(Some(200));
    let repo = BindingRepository::new(store);
    repo.save(binding("a", "x.test"))
        .await
        .expect_err("a single binding exceeds 200 bytes");
    assert!(repo.list().await.expect("list").is_empty());
}
