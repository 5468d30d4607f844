//! Sled-backed comment store
//!
//! Records are bincode-encoded and keyed by big-endian id so iteration order
//! follows id order. Comments live in their own tree; a commit is one
//! `sled::Batch` against that tree, which sled applies atomically.

use super::{CommentNode, CommentStore, CommitBatch, Directory, Item, Writer};
use crate::concurrency::NodeLockManager;
use crate::error::StorageError;
use crate::types::{CommentId, ItemId, WriterId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

const COMMENTS_TREE: &str = "comments";
const ITEMS_TREE: &str = "items";
const WRITERS_TREE: &str = "writers";

pub struct SledCommentStore {
    db: sled::Db,
    comments: sled::Tree,
    items: sled::Tree,
    writers: sled::Tree,
    locks: Arc<NodeLockManager>,
}

impl SledCommentStore {
    /// Open (or create) a store at the given directory
    pub fn new(path: &Path) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Wrap an already opened database
    pub fn from_db(db: sled::Db) -> Result<Self, StorageError> {
        Ok(Self {
            comments: db.open_tree(COMMENTS_TREE)?,
            items: db.open_tree(ITEMS_TREE)?,
            writers: db.open_tree(WRITERS_TREE)?,
            locks: Arc::new(NodeLockManager::new()),
            db,
        })
    }

    /// Ids start at 1; 0 marks an unattached reference.
    fn generate_id(&self) -> Result<u64, StorageError> {
        Ok(self.db.generate_id()? + 1)
    }

    fn load<T: DeserializeOwned>(tree: &sled::Tree, id: u64) -> Result<Option<T>, StorageError> {
        match tree.get(key(id))? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn store<T: Serialize>(&self, tree: &sled::Tree, id: u64, record: &T) -> Result<(), StorageError> {
        tree.insert(key(id), bincode::serialize(record)?)?;
        self.db.flush()?;
        Ok(())
    }
}

fn key(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

impl CommentStore for SledCommentStore {
    fn get(&self, id: CommentId) -> Result<Option<CommentNode>, StorageError> {
        Self::load(&self.comments, id)
    }

    fn next_id(&self) -> Result<CommentId, StorageError> {
        self.generate_id()
    }

    fn commit(&self, batch: CommitBatch) -> Result<(), StorageError> {
        batch.check()?;
        let mut sled_batch = sled::Batch::default();
        for node in &batch.puts {
            sled_batch.insert(&key(node.id)[..], bincode::serialize(node)?);
        }
        for id in &batch.deletes {
            sled_batch.remove(&key(*id)[..]);
        }
        self.comments.apply_batch(sled_batch)?;
        self.db.flush()?;
        Ok(())
    }

    fn list_by_item(&self, item: ItemId) -> Result<Vec<CommentNode>, StorageError> {
        let mut nodes = Vec::new();
        for entry in self.comments.iter() {
            let (_, bytes) = entry?;
            let node: CommentNode = bincode::deserialize(&bytes)?;
            if node.item == item {
                nodes.push(node);
            }
        }
        Ok(nodes)
    }

    fn locks(&self) -> Arc<NodeLockManager> {
        self.locks.clone()
    }
}

impl Directory for SledCommentStore {
    fn item(&self, id: ItemId) -> Result<Option<Item>, StorageError> {
        Self::load(&self.items, id)
    }

    fn writer(&self, id: WriterId) -> Result<Option<Writer>, StorageError> {
        Self::load(&self.writers, id)
    }

    fn put_item(&self, title: &str) -> Result<Item, StorageError> {
        let item = Item {
            id: self.generate_id()?,
            title: title.to_string(),
        };
        self.store(&self.items, item.id, &item)?;
        Ok(item)
    }

    fn put_writer(&self, name: &str) -> Result<Writer, StorageError> {
        let writer = Writer {
            id: self.generate_id()?,
            name: name.to_string(),
        };
        self.store(&self.writers, writer.id, &writer)?;
        Ok(writer)
    }
}
