//! Behaviour tests for host-level operations.

#![cfg(unix)]

mod support;

use stonekeeper::{Site, Stone};
use support::Sandbox;

#[test]
fn status_lists_the_host() {
    let sandbox = Sandbox::new();
    let status = Site::new(sandbox.installation()).status().expect("status");
    assert!(status.contains("Name"), "unexpected status: {status}");
}

#[test]
fn stones_reflects_the_configured_set() {
    let sandbox = Sandbox::new();
    let site = Site::new(sandbox.installation());
    assert_eq!(site.stones().expect("empty set"), Vec::<String>::new());
    Stone::create(sandbox.installation(), "listed").expect("create stone");
    assert_eq!(site.stones().expect("one stone"), vec!["listed".to_owned()]);
}

#[test]
fn netldi_start_and_stop_complete() {
    let sandbox = Sandbox::new();
    let site = Site::new(sandbox.installation());
    site.start_netldi().expect("start netldi");
    site.stop_netldi().expect("stop netldi");
}
