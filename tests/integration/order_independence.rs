use proptest::prelude::*;
use remark::types::CommentId;

use crate::support::{Backend, Harness};

/// Reply count and a delete order over indices `0..=n`, where 0 is the root
fn arb_thread_order() -> impl Strategy<Value = (usize, Vec<usize>, usize)> {
    (0usize..6).prop_flat_map(|replies| {
        let members: Vec<usize> = (0..=replies).collect();
        (
            Just(replies),
            Just(members).prop_shuffle(),
            0..=replies + 1,
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn purge_happens_once_when_last_member_is_removed((replies, order, deletes) in arb_thread_order()) {
        let h = Harness::new(Backend::Memory);
        let (root, reply_ids) = h.thread(replies);
        let members: Vec<CommentId> = std::iter::once(root).chain(reply_ids).collect();
        let total = members.len();

        let mut purged_by: Option<usize> = None;
        let mut purged = Vec::new();
        for (step, &index) in order.iter().take(deletes).enumerate() {
            let report = h.service.delete(&h.author, members[index]).unwrap();
            if !report.purged.is_empty() {
                prop_assert!(purged_by.is_none());
                purged_by = Some(step);
                purged = report.purged_ids();
            }

            // Deleted members never come back to life
            for &done in order.iter().take(step + 1) {
                match h.fetch(members[done]) {
                    Ok(node) => prop_assert!(node.is_removed()),
                    Err(e) => prop_assert!(e.is_not_found()),
                }
            }
        }

        if deletes == total {
            prop_assert_eq!(purged_by, Some(total - 1));
            purged.sort_unstable();
            let mut expected = members.clone();
            expected.sort_unstable();
            prop_assert_eq!(purged, expected);
            for &id in &members {
                prop_assert!(h.is_gone(id));
            }
        } else {
            prop_assert_eq!(purged_by, None);
            for &id in &members {
                prop_assert!(h.fetch(id).is_ok());
            }
        }
    }
}
