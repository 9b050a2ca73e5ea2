//! Storage adapters implementing the persistence ports.

mod in_memory;

pub use in_memory::InMemoryConversationStore;
