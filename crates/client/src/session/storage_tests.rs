// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn memory_get_set_remove() {
    let storage = MemoryStorage::default();
    assert_eq!(storage.get("token"), None);

    storage.set("token", "abc");
    assert_eq!(storage.get("token"), Some("abc".to_owned()));

    storage.set("token", "def");
    assert_eq!(storage.get("token"), Some("def".to_owned()));

    storage.remove("token");
    assert_eq!(storage.get("token"), None);
}

#[test]
fn remove_missing_key_is_a_no_op() {
    let storage = MemoryStorage::default();
    storage.remove("never-set");
    assert_eq!(storage.get("never-set"), None);
}

#[test]
fn file_storage_persists_across_open() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("session.json");

    let storage = FileStorage::open(&path);
    storage.set("token", "a1");
    storage.set("username", "admin");
    drop(storage);

    let reopened = FileStorage::open(&path);
    assert_eq!(reopened.get("token"), Some("a1".to_owned()));
    assert_eq!(reopened.get("username"), Some("admin".to_owned()));
    Ok(())
}

#[test]
fn file_storage_remove_persists() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("session.json");

    let storage = FileStorage::open(&path);
    storage.set("token", "a1");
    storage.remove("token");
    drop(storage);

    let reopened = FileStorage::open(&path);
    assert_eq!(reopened.get("token"), None);
    Ok(())
}

#[test]
fn file_storage_missing_file_starts_empty() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let storage = FileStorage::open(dir.path().join("does-not-exist.json"));
    assert_eq!(storage.get("token"), None);
    Ok(())
}

#[test]
fn file_storage_ignores_malformed_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("session.json");
    std::fs::write(&path, "not json at all")?;

    let storage = FileStorage::open(&path);
    assert_eq!(storage.get("token"), None);

    // A fresh write replaces the malformed file with a valid one.
    storage.set("token", "a1");
    let reopened = FileStorage::open(&path);
    assert_eq!(reopened.get("token"), Some("a1".to_owned()));
    Ok(())
}

#[test]
fn file_storage_creates_parent_directories() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested/profile/session.json");

    let storage = FileStorage::open(&path);
    storage.set("token", "a1");

    let reopened = FileStorage::open(&path);
    assert_eq!(reopened.get("token"), Some("a1".to_owned()));
    Ok(())
}
