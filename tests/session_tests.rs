//! Integration tests for session token persistence.

use std::fs;
use std::path::PathBuf;

use starling::SessionStore;

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("starling-session-{}-{}", name, std::process::id()))
}

#[test]
fn token_survives_across_stores() {
    let dir = scratch_path("survives");
    let _ = fs::remove_dir_all(&dir);

    let first = SessionStore::with_dir(&dir).current();
    let second = SessionStore::with_dir(&dir).current();
    assert_eq!(first, second);

    fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn reset_rotates_and_persists_the_token() {
    let dir = scratch_path("reset");
    let _ = fs::remove_dir_all(&dir);

    let store = SessionStore::with_dir(&dir);
    let original = store.current();
    let rotated = store.reset();
    assert_ne!(original, rotated);

    // A fresh store sees the rotated token.
    assert_eq!(SessionStore::with_dir(&dir).current(), rotated);

    fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn stores_with_different_directories_are_independent() {
    let dir_a = scratch_path("independent-a");
    let dir_b = scratch_path("independent-b");
    let _ = fs::remove_dir_all(&dir_a);
    let _ = fs::remove_dir_all(&dir_b);

    let token_a = SessionStore::with_dir(&dir_a).current();
    let token_b = SessionStore::with_dir(&dir_b).current();
    assert_ne!(token_a, token_b);

    fs::remove_dir_all(&dir_a).expect("cleanup a");
    fs::remove_dir_all(&dir_b).expect("cleanup b");
}

#[test]
fn unwritable_directory_falls_back_to_an_in_memory_token() {
    let blocker = scratch_path("blocked");
    let _ = fs::remove_dir_all(&blocker);
    let _ = fs::remove_file(&blocker);
    fs::write(&blocker, "not a directory").expect("scratch file");

    // The parent path is a file, so persistence cannot work.
    let store = SessionStore::with_dir(blocker.join("nested"));
    let token = store.current();
    assert!(!token.is_empty());
    assert_eq!(store.current(), token);

    fs::remove_file(&blocker).expect("cleanup");
}
