use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    domain::message::ClassroomMessage,
    use_cases::{classroom_database::ClassroomDatabase, message_database::MessageDatabase},
};

type ChatResult<T> = Result<T, ChatError>;

const DEFAULT_KIND: &str = "text";

pub async fn post_message(
    message_db: Arc<impl MessageDatabase>,
    classroom_db: Arc<impl ClassroomDatabase>,
    classroom_id: Uuid,
    sender: String,
    body: String,
    kind: Option<String>,
) -> ChatResult<ClassroomMessage> {
    if body.trim().is_empty() {
        return Err(ChatError::EmptyMessage);
    }

    // Membership is checked at posting time only; messages from members
    // who later leave stay in the log.
    let classroom = classroom_db
        .classroom_by_id(classroom_id)
        .await
        .map_err(|err| ChatError::DatabaseError(err.to_string()))?
        .ok_or(ChatError::ClassroomNotFound)?;

    if !classroom.is_member(&sender) {
        return Err(ChatError::NotMember);
    }

    let message = ClassroomMessage {
        id: Uuid::new_v4(),
        classroom_id,
        sender,
        body,
        kind: kind.unwrap_or_else(|| DEFAULT_KIND.to_string()),
        created_at: Utc::now(),
    };

    message_db
        .append_message(message.clone())
        .await
        .map_err(|err| ChatError::DatabaseError(err.to_string()))?;

    Ok(message)
}

pub async fn list_messages(
    message_db: Arc<impl MessageDatabase>,
    classroom_db: Arc<impl ClassroomDatabase>,
    classroom_id: Uuid,
    requester: String,
) -> ChatResult<Vec<ClassroomMessage>> {
    let classroom = classroom_db
        .classroom_by_id(classroom_id)
        .await
        .map_err(|err| ChatError::DatabaseError(err.to_string()))?
        .ok_or(ChatError::ClassroomNotFound)?;

    if !classroom.is_member(&requester) {
        return Err(ChatError::NotMember);
    }

    message_db
        .messages_for_classroom(classroom_id)
        .await
        .map_err(|err| ChatError::DatabaseError(err.to_string()))
}

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("message body is required")]
    EmptyMessage,
    #[error("classroom not found")]
    ClassroomNotFound,
    #[error("not a member of this classroom")]
    NotMember,
    #[error("database error: {0}")]
    DatabaseError(String),
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use chrono::Utc;
    use uuid::Uuid;

    use crate::{
        domain::classroom::Classroom,
        use_cases::{
            chat_service::{ChatError, list_messages, post_message},
            classroom_database::MockClassroomDatabase,
            message_database::MockMessageDatabase,
        },
    };

    fn classroom_with(members: &[&str]) -> Classroom {
        Classroom {
            id: Uuid::new_v4(),
            name: "algebra study group".to_string(),
            description: String::new(),
            subject: "Math".to_string(),
            owner: members[0].to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
            capacity: 20,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn post_requires_membership() {
        let message_db = MockMessageDatabase::new();
        let mut classroom_db = MockClassroomDatabase::new();
        let classroom = classroom_with(&["alice"]);

        classroom_db
            .expect_classroom_by_id()
            .returning(move |_| Ok(Some(classroom.clone())));

        let result = post_message(
            Arc::new(message_db),
            Arc::new(classroom_db),
            Uuid::new_v4(),
            "mallory".to_string(),
            "hi".to_string(),
            None,
        )
        .await;

        assert!(matches!(result, Err(ChatError::NotMember)));
    }

    #[tokio::test]
    async fn post_rejects_blank_body() {
        let message_db = MockMessageDatabase::new();
        let classroom_db = MockClassroomDatabase::new();

        let result = post_message(
            Arc::new(message_db),
            Arc::new(classroom_db),
            Uuid::new_v4(),
            "alice".to_string(),
            "   ".to_string(),
            None,
        )
        .await;

        assert!(matches!(result, Err(ChatError::EmptyMessage)));
    }

    #[tokio::test]
    async fn post_defaults_kind_to_text() {
        let mut message_db = MockMessageDatabase::new();
        let mut classroom_db = MockClassroomDatabase::new();
        let classroom = classroom_with(&["alice"]);

        classroom_db
            .expect_classroom_by_id()
            .returning(move |_| Ok(Some(classroom.clone())));
        message_db
            .expect_append_message()
            .withf(|message| message.kind == "text" && message.sender == "alice")
            .once()
            .returning(|_| Ok(()));

        let message = post_message(
            Arc::new(message_db),
            Arc::new(classroom_db),
            Uuid::new_v4(),
            "alice".to_string(),
            "hi everyone".to_string(),
            None,
        )
        .await
        .unwrap();

        assert_eq!(message.body, "hi everyone");
    }

    #[tokio::test]
    async fn list_requires_membership() {
        let message_db = MockMessageDatabase::new();
        let mut classroom_db = MockClassroomDatabase::new();
        let classroom = classroom_with(&["alice"]);

        classroom_db
            .expect_classroom_by_id()
            .returning(move |_| Ok(Some(classroom.clone())));

        let result = list_messages(
            Arc::new(message_db),
            Arc::new(classroom_db),
            Uuid::new_v4(),
            "mallory".to_string(),
        )
        .await;

        assert!(matches!(result, Err(ChatError::NotMember)));
    }
}
