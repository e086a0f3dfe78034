//! Cross-thread contextual binding scenarios
//!
//! Each thread owns its own execution context; entry sets and the
//! coordination hub are the only shared state. Sequencing between
//! threads uses channels, never sleeps, so the visibility assertions
//! are exact: a context observes nothing it has not pulled.

use ctx_core::{ContextualBinding, CoordinationHub, ExecutionContext, SpecPath, StaticLayer};
use ctx_entries::{Entry, EntryName, EntrySet, SharedEntrySet};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

fn shared(pairs: &[(&str, &str)]) -> SharedEntrySet {
    let set: EntrySet = pairs
        .iter()
        .map(|(n, v)| Entry::new(EntryName::parse(n).unwrap(), *v))
        .collect();
    SharedEntrySet::new(set)
}

/// Writes through bindings are visible to peers only after those peers
/// pull via `update()`; fresh construction always resolves fresh.
#[test]
fn entry_writes_propagate_only_on_update() {
    let entries = shared(&[("user/hello", "22")]);
    let hub = Arc::new(CoordinationHub::new());
    let path = SpecPath::parse("/hello").unwrap();

    let mut main_ctx = ExecutionContext::new(Arc::clone(&hub));
    let value = ContextualBinding::<i32>::new(&entries, &mut main_ctx, path.clone()).unwrap();
    assert_eq!(value.get(), 22);

    value.set(8);
    assert_eq!(value.get(), 8);

    let (wrote_five_tx, wrote_five_rx) = mpsc::channel::<()>();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    let writer = {
        let entries = entries.clone();
        let hub = Arc::clone(&hub);
        let path = path.clone();
        thread::spawn(move || {
            let mut ctx = ExecutionContext::new(hub);
            // construction resolves fresh: the main thread's write is visible
            let binding = ContextualBinding::<i32>::new(&entries, &mut ctx, path).unwrap();
            assert_eq!(binding.get(), 8);

            binding.set(5);
            assert_eq!(binding.get(), 5);

            wrote_five_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            // nobody wrote in between; the cache is still consistent
            assert_eq!(binding.get(), 5);
        })
    };

    wrote_five_rx.recv().unwrap();
    // stale until pulled
    assert_eq!(value.get(), 8);
    main_ctx.update().unwrap();
    assert_eq!(value.get(), 5);

    let second_writer = {
        let entries = entries.clone();
        let hub = Arc::clone(&hub);
        let path = path.clone();
        thread::spawn(move || {
            let mut ctx = ExecutionContext::new(hub);
            let binding = ContextualBinding::<i32>::new(&entries, &mut ctx, path).unwrap();
            assert_eq!(binding.get(), 5);

            ctx.update().unwrap();
            assert_eq!(binding.get(), 5);

            binding.set(12);
            assert_eq!(binding.get(), 12);
        })
    };
    second_writer.join().unwrap();

    release_tx.send(()).unwrap();
    writer.join().unwrap();

    main_ctx.update().unwrap();
    assert_eq!(value.get(), 12);
    assert_eq!(
        entries
            .read()
            .lookup(&EntryName::parse("user/hello").unwrap())
            .unwrap()
            .value(),
        Some("12")
    );
}

/// Layer activation in one thread is pull-based for peers: the peer
/// resolves the inactive-layer default until it calls `sync_layers()`,
/// adopts the activation, and later reverts the same way.
#[test]
fn layer_activation_propagates_only_on_sync_layers() {
    let entries = shared(&[("user/act/%", "10"), ("user/act/active", "22")]);
    let hub = Arc::new(CoordinationHub::new());
    let path = SpecPath::parse("/act/%activate%").unwrap();
    let toggle = Arc::new(AtomicBool::new(false));

    let mut main_ctx = ExecutionContext::new(Arc::clone(&hub));
    let value = ContextualBinding::<i32>::new(&entries, &mut main_ctx, path.clone()).unwrap();
    assert_eq!(value.get(), 10);

    let (activated_tx, activated_rx) = mpsc::channel::<()>();
    let (observed_tx, observed_rx) = mpsc::channel::<()>();

    let activator = {
        let entries = entries.clone();
        let hub = Arc::clone(&hub);
        let path = path.clone();
        let toggle = Arc::clone(&toggle);
        thread::spawn(move || {
            let mut ctx = ExecutionContext::new(hub);
            let binding = ContextualBinding::<i32>::new(&entries, &mut ctx, path).unwrap();

            let on = Arc::clone(&toggle);
            ctx.on_layer_activation("activate", move || on.store(true, Ordering::SeqCst));
            let off = Arc::clone(&toggle);
            ctx.on_layer_deactivation("activate", move || off.store(false, Ordering::SeqCst));

            assert_eq!(binding.get(), 10);

            let layer = StaticLayer::new("activate", "active");
            ctx.activate(&layer).unwrap();
            assert!(toggle.load(Ordering::SeqCst));
            assert_eq!(binding.get(), 22);

            activated_tx.send(()).unwrap();
            observed_rx.recv().unwrap();
            // activation stays local-stable while the peer observes it
            assert_eq!(binding.get(), 22);

            ctx.deactivate(&layer).unwrap();
            assert!(!toggle.load(Ordering::SeqCst));
            assert_eq!(binding.get(), 10);
        })
    };

    activated_rx.recv().unwrap();
    // the activation callback already fired on the activator's thread,
    // but this context has not pulled and still sees the default
    assert!(toggle.load(Ordering::SeqCst));
    assert_eq!(value.get(), 10);

    main_ctx.sync_layers().unwrap();
    assert_eq!(value.get(), 22);

    observed_tx.send(()).unwrap();
    activator.join().unwrap();

    // the deactivation is published but not yet pulled
    assert!(!toggle.load(Ordering::SeqCst));
    assert_eq!(value.get(), 22);

    main_ctx.sync_layers().unwrap();
    assert_eq!(value.get(), 10);
}

/// A context constructed after a peer published its layers adopts the
/// hub snapshot immediately, without an explicit `sync_layers()`.
#[test]
fn late_context_starts_from_published_snapshot() {
    let entries = shared(&[("user/act/%", "10"), ("user/act/active", "22")]);
    let hub = Arc::new(CoordinationHub::new());
    let path = SpecPath::parse("/act/%activate%").unwrap();

    let mut producer = ExecutionContext::new(Arc::clone(&hub));
    producer
        .activate(&StaticLayer::new("activate", "active"))
        .unwrap();

    let late = thread::spawn({
        let entries = entries.clone();
        let hub = Arc::clone(&hub);
        let path = path.clone();
        move || {
            let mut ctx = ExecutionContext::new(hub);
            let binding = ContextualBinding::<i32>::new(&entries, &mut ctx, path).unwrap();
            binding.get()
        }
    });

    assert_eq!(late.join().unwrap(), 22);
}
