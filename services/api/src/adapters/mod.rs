pub mod db;
pub mod memory;
pub mod message_llm;
pub mod message_template;

pub use db::DbAdapter;
pub use memory::InMemoryStore;
pub use message_llm::OpenAiMessageAdapter;
pub use message_template::TemplateMessageAdapter;
