pub mod chat_service;
pub mod classroom_database;
pub mod classroom_service;
pub mod entity_locks;
pub mod message_database;
pub mod quiz_database;
pub mod quiz_service;
