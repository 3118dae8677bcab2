// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use super::*;
use crate::session::storage::MemoryStorage;

fn store_with_shared_storage() -> (SessionStore, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::default());
    (SessionStore::new(Box::new(Arc::clone(&storage))), storage)
}

fn sample_identity() -> Identity {
    Identity {
        username: "admin".to_owned(),
        usertype: "superuser".to_owned(),
        django_usertype: "staff".to_owned(),
        user_id: "42".to_owned(),
    }
}

#[test]
fn is_authenticated_tracks_access_token() {
    let (store, _storage) = store_with_shared_storage();
    assert!(!store.is_authenticated());

    store.set_access_token(Some("a1"));
    assert!(store.is_authenticated());
    assert_eq!(store.access_token(), Some("a1".to_owned()));

    store.set_access_token(None);
    assert!(!store.is_authenticated());
    assert_eq!(store.access_token(), None);
}

#[test]
fn mutators_write_through_to_storage() {
    let (store, storage) = store_with_shared_storage();

    store.set_access_token(Some("a1"));
    store.set_refresh_token(Some("r1"));
    store.set_identity(sample_identity());

    assert_eq!(storage.get("token"), Some("a1".to_owned()));
    assert_eq!(storage.get("refreshToken"), Some("r1".to_owned()));
    assert_eq!(storage.get("username"), Some("admin".to_owned()));
    assert_eq!(storage.get("usertype"), Some("superuser".to_owned()));
    assert_eq!(storage.get("django_user_type"), Some("staff".to_owned()));
    assert_eq!(storage.get("userId"), Some("42".to_owned()));
}

#[test]
fn clearing_a_token_removes_its_persisted_key() {
    let (store, storage) = store_with_shared_storage();
    store.set_access_token(Some("a1"));
    store.set_access_token(None);
    assert_eq!(storage.get("token"), None);
}

#[test]
fn clear_removes_all_persisted_fields() {
    let (store, storage) = store_with_shared_storage();
    store.set_access_token(Some("a1"));
    store.set_refresh_token(Some("r1"));
    store.set_identity(sample_identity());
    store.set_password_reset_required(true);

    store.clear();

    assert!(!store.is_authenticated());
    assert_eq!(store.access_token(), None);
    assert_eq!(store.refresh_token(), None);
    assert_eq!(store.identity(), None);
    assert!(!store.password_reset_required());
    for key in ["token", "refreshToken", "username", "usertype", "django_user_type", "userId"] {
        assert_eq!(storage.get(key), None, "key {key:?} should be gone");
    }
}

#[test]
fn clear_is_idempotent() {
    let (store, _storage) = store_with_shared_storage();
    store.set_access_token(Some("a1"));
    store.clear();
    store.clear();
    assert!(!store.is_authenticated());
}

#[test]
fn store_reloads_persisted_fields() {
    let storage = Arc::new(MemoryStorage::default());
    {
        let store = SessionStore::new(Box::new(Arc::clone(&storage)));
        store.set_access_token(Some("a1"));
        store.set_refresh_token(Some("r1"));
        store.set_identity(sample_identity());
    }

    let reloaded = SessionStore::new(Box::new(Arc::clone(&storage)));
    assert!(reloaded.is_authenticated());
    assert_eq!(reloaded.access_token(), Some("a1".to_owned()));
    assert_eq!(reloaded.refresh_token(), Some("r1".to_owned()));
    assert_eq!(reloaded.identity(), Some(sample_identity()));
}

#[test]
fn password_reset_flag_is_not_persisted() {
    let storage = Arc::new(MemoryStorage::default());
    {
        let store = SessionStore::new(Box::new(Arc::clone(&storage)));
        store.set_access_token(Some("a1"));
        store.set_password_reset_required(true);
    }

    let reloaded = SessionStore::new(Box::new(Arc::clone(&storage)));
    assert!(!reloaded.password_reset_required());
}

#[test]
fn identity_requires_a_persisted_username() {
    let storage = Arc::new(MemoryStorage::default());
    storage.set("usertype", "superuser");

    let store = SessionStore::new(Box::new(Arc::clone(&storage)));
    assert_eq!(store.identity(), None);
}
