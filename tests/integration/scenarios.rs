use std::sync::Arc;

use remark::auth::Principal;
use remark::service::CommentService;
use remark::store::persistence::SledCommentStore;
use remark::store::{CommentStore, Directory, NodeState};
use tempfile::TempDir;

use crate::support::{Harness, BACKENDS};

#[test]
fn root_with_live_replies_becomes_tombstone() {
    for backend in BACKENDS {
        let h = Harness::new(backend);
        let (root, replies) = h.thread(4);

        let purged = h.delete(root);

        assert!(purged.is_empty(), "{:?}", backend);
        assert!(h.fetch(root).unwrap().is_removed());
        for reply in replies {
            assert_eq!(h.fetch(reply).unwrap().state(), NodeState::Live);
        }
    }
}

#[test]
fn childless_root_is_purged_at_once() {
    for backend in BACKENDS {
        let h = Harness::new(backend);
        let root = h.root();

        assert_eq!(h.delete(root), vec![root], "{:?}", backend);
        assert!(h.is_gone(root));
    }
}

#[test]
fn deleting_replies_then_root_purges_everything() {
    for backend in BACKENDS {
        let h = Harness::new(backend);
        let (root, replies) = h.thread(4);

        for &reply in &replies {
            assert!(h.delete(reply).is_empty(), "{:?}", backend);
        }
        let mut purged = h.delete(root);
        purged.sort_unstable();

        let mut expected = replies.clone();
        expected.push(root);
        expected.sort_unstable();
        assert_eq!(purged, expected);
        for id in expected {
            assert!(h.is_gone(id));
        }
    }
}

#[test]
fn reply_under_live_root_stays_as_tombstone() {
    for backend in BACKENDS {
        let h = Harness::new(backend);
        let (root, replies) = h.thread(1);

        assert!(h.delete(replies[0]).is_empty(), "{:?}", backend);

        assert!(h.fetch(replies[0]).unwrap().is_removed());
        assert!(!h.fetch(root).unwrap().is_removed());
    }
}

#[test]
fn live_sibling_keeps_removed_thread_and_last_delete_purges_it() {
    for backend in BACKENDS {
        let h = Harness::new(backend);
        let (root, replies) = h.thread(3);
        let (r1, r2, r3) = (replies[0], replies[1], replies[2]);

        h.delete(r2);
        h.delete(root);
        assert!(h.delete(r3).is_empty(), "{:?}", backend);
        for id in [root, r1, r2, r3] {
            assert!(h.fetch(id).is_ok());
        }

        let mut purged = h.delete(r1);
        purged.sort_unstable();
        let mut expected = vec![root, r1, r2, r3];
        expected.sort_unstable();
        assert_eq!(purged, expected);
        for id in expected {
            assert!(h.is_gone(id));
        }
    }
}

#[test]
fn tombstoned_thread_shows_placeholder_until_purged() {
    for backend in BACKENDS {
        let h = Harness::new(backend);
        let root = h.root();
        let reply = h
            .service
            .create_reply(&h.replier, h.item, root, "still here")
            .unwrap()
            .id;
        h.delete(root);

        let thread = h.service.thread(h.item).unwrap();
        assert_eq!(thread.comments.len(), 1, "{:?}", backend);
        assert_eq!(thread.comments[0].content, None);
        assert_eq!(thread.comments[0].replies[0].id, reply);
        assert_eq!(
            thread.comments[0].replies[0].display_content(),
            "still here"
        );

        h.service.delete(&h.replier, reply).unwrap();
        assert!(h.service.thread(h.item).unwrap().is_empty());
    }
}

#[test]
fn sled_store_survives_reopen_with_tombstones() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store");
    let (root, reply) = {
        let store = Arc::new(SledCommentStore::new(&path).unwrap());
        let author = Principal::new(store.put_writer("w").unwrap().id);
        let item = store.put_item("i").unwrap().id;
        let service = CommentService::from_store(store);
        let root = service.create_root_comment(&author, item, "root").unwrap().id;
        let reply = service.create_reply(&author, item, root, "reply").unwrap().id;
        service.delete(&author, root).unwrap();
        (root, reply)
    };

    let store = SledCommentStore::new(&path).unwrap();
    let stored_root = store.get(root).unwrap().unwrap();
    assert_eq!(stored_root.state(), NodeState::Tombstoned);
    assert!(stored_root.children().contains(&reply));
    assert_eq!(store.get(reply).unwrap().unwrap().state(), NodeState::Live);
}
