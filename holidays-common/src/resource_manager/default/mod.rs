mod in_memory_store;
mod local_fs_store;

pub use in_memory_store::{InMemoryObjectStore, StoredObject};
pub use local_fs_store::LocalFileSystemObjectStore;
