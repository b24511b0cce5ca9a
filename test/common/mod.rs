use std::sync::Arc;

use studyhall_backend::{
    domain::quiz::QuizQuestion, infra::memory::MemoryDatabase, use_cases::entity_locks::EntityLocks,
};

pub struct TestBackend {
    pub db: Arc<MemoryDatabase>,
    pub locks: Arc<EntityLocks>,
}

pub fn backend() -> TestBackend {
    TestBackend {
        db: Arc::new(MemoryDatabase::new()),
        locks: Arc::new(EntityLocks::new()),
    }
}

#[allow(dead_code)]
pub fn question(prompt: &str, options: &[&str], correct_index: usize) -> QuizQuestion {
    QuizQuestion {
        prompt: prompt.to_string(),
        options: options.iter().map(|option| option.to_string()).collect(),
        correct_index,
    }
}
