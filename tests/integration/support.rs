use std::sync::Arc;

use remark::auth::Principal;
use remark::error::ApiError;
use remark::service::CommentService;
use remark::store::memory::MemoryCommentStore;
use remark::store::persistence::SledCommentStore;
use remark::store::{CommentNode, CommentStore, Directory};
use remark::types::{CommentId, ItemId};
use tempfile::TempDir;

/// Which backend a harness runs against
#[derive(Debug, Clone, Copy)]
pub enum Backend {
    Memory,
    Sled,
}

pub const BACKENDS: [Backend; 2] = [Backend::Memory, Backend::Sled];

pub struct Harness {
    pub service: CommentService,
    pub store: Arc<dyn CommentStore>,
    pub author: Principal,
    pub replier: Principal,
    pub item: ItemId,
    _temp_dir: Option<TempDir>,
}

impl Harness {
    pub fn new(backend: Backend) -> Self {
        match backend {
            Backend::Memory => Self::build(Arc::new(MemoryCommentStore::new()), None),
            Backend::Sled => {
                let temp_dir = TempDir::new().unwrap();
                let store = SledCommentStore::new(&temp_dir.path().join("store")).unwrap();
                Self::build(Arc::new(store), Some(temp_dir))
            }
        }
    }

    fn build<S>(store: Arc<S>, temp_dir: Option<TempDir>) -> Self
    where
        S: CommentStore + Directory + 'static,
    {
        let author = Principal::new(store.put_writer("author").unwrap().id);
        let replier = Principal::new(store.put_writer("replier").unwrap().id);
        let item = store.put_item("Launch notes").unwrap().id;
        Self {
            service: CommentService::from_store(store.clone()),
            store,
            author,
            replier,
            item,
            _temp_dir: temp_dir,
        }
    }

    pub fn root(&self) -> CommentId {
        self.service
            .create_root_comment(&self.author, self.item, "root comment")
            .unwrap()
            .id
    }

    /// A root with `n` replies, all written by the root's author
    pub fn thread(&self, n: usize) -> (CommentId, Vec<CommentId>) {
        let root = self.root();
        let replies = (0..n)
            .map(|i| {
                self.service
                    .create_reply(&self.author, self.item, root, &format!("reply {}", i))
                    .unwrap()
                    .id
            })
            .collect();
        (root, replies)
    }

    pub fn delete(&self, id: CommentId) -> Vec<CommentId> {
        self.service.delete(&self.author, id).unwrap().purged_ids()
    }

    pub fn fetch(&self, id: CommentId) -> Result<CommentNode, ApiError> {
        self.service.get(id)
    }

    pub fn is_gone(&self, id: CommentId) -> bool {
        matches!(self.fetch(id), Err(ApiError::CommentNotFound(_)))
    }
}
