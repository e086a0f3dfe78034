//! End-to-end flow through the collaborators: durable store, contextual
//! bindings, redirect table and display tree.

use ctx_core::{ContextualBinding, CoordinationHub, ExecutionContext, SpecPath};
use ctx_entries::{EntryName, SharedEntrySet};
use ctx_intercept::RedirectTable;
use ctx_store::{EntryStore, TomlStore};
use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn seed_store(dir: &TempDir) -> TomlStore {
    let path = dir.path().join("store.toml");
    fs::write(
        &path,
        r#"
["user/hello"]
value = "22"

["user/act/%"]
value = "10"

["user/act/active"]
value = "22"

["user/preload/open/etc/hosts"]
value = "/tmp/hosts"

["user/preload/open/etc/hosts/readonly"]
value = "1"
"#,
    )
    .unwrap();
    TomlStore::open(path)
}

#[test]
fn load_bind_write_commit_reload() {
    let dir = TempDir::new().unwrap();
    let mut store = seed_store(&dir);

    let entries = SharedEntrySet::new(store.load().unwrap());
    let hub = Arc::new(CoordinationHub::new());
    let mut ctx = ExecutionContext::new(hub);

    let value = ContextualBinding::<i32>::new(
        &entries,
        &mut ctx,
        SpecPath::parse("/hello").unwrap(),
    )
    .unwrap();
    assert_eq!(value.get(), 22);

    value.set(8);
    assert_eq!(value.get(), 8);

    store.commit(&entries.read()).unwrap();

    // a second process materializing the same store sees the write
    let reloaded = store.load().unwrap();
    assert_eq!(
        reloaded
            .lookup(&EntryName::parse("user/hello").unwrap())
            .unwrap()
            .value(),
        Some("8")
    );
}

#[test]
fn fresh_context_on_same_entries_resolves_committed_write() {
    let dir = TempDir::new().unwrap();
    let mut store = seed_store(&dir);
    let entries = SharedEntrySet::new(store.load().unwrap());
    let hub = Arc::new(CoordinationHub::new());
    let path = SpecPath::parse("/hello").unwrap();

    let mut first = ExecutionContext::new(Arc::clone(&hub));
    let binding = ContextualBinding::<i32>::new(&entries, &mut first, path.clone()).unwrap();
    binding.set(8);

    // construction resolves fresh, no update() needed
    let mut second = ExecutionContext::new(Arc::clone(&hub));
    let peer = ContextualBinding::<i32>::new(&entries, &mut second, path).unwrap();
    assert_eq!(peer.get(), 8);
}

#[test]
fn cut_scopes_the_set_for_one_spec_path_family() {
    let dir = TempDir::new().unwrap();
    let mut store = seed_store(&dir);
    let mut full = store.load().unwrap();

    let act = full.cut(&EntryName::parse("user/act").unwrap());
    assert_eq!(act.len(), 2);
    assert!(full.lookup(&EntryName::parse("user/act/%").unwrap()).is_none());

    let entries = SharedEntrySet::new(act);
    let hub = Arc::new(CoordinationHub::new());
    let mut ctx = ExecutionContext::new(hub);
    let binding = ContextualBinding::<i32>::new(
        &entries,
        &mut ctx,
        SpecPath::parse("/act/%activate%").unwrap(),
    )
    .unwrap();
    assert_eq!(binding.get(), 10);
}

#[test]
fn redirect_table_builds_from_loaded_store() {
    let dir = TempDir::new().unwrap();
    let mut store = seed_store(&dir);
    let set = store.load().unwrap();

    let table =
        RedirectTable::from_entries(&set, &EntryName::parse("user/preload/open").unwrap());
    assert_eq!(table.len(), 1);
    let redirect = table.lookup("/etc/hosts").unwrap();
    assert_eq!(redirect.target, "/tmp/hosts");
    assert!(redirect.readonly);
}

#[test]
fn display_tree_reflects_loaded_entries() {
    let dir = TempDir::new().unwrap();
    let mut store = seed_store(&dir);
    let set = store.load().unwrap();

    let tree = ctx_view::build_tree(&set);
    let rendered = ctx_view::render(&tree);
    assert!(rendered.contains("hello = 22"));
    assert!(rendered.contains("% = 10"));
    assert!(rendered.contains("active = 22"));
}
