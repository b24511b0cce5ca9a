use studyhall_backend::{
    domain::quiz::QuizState,
    use_cases::{
        classroom_service::{create_classroom, join_classroom, leave_classroom},
        quiz_service::{
            QuizError, create_session, get_session, join_session, list_sessions,
            sessions_for_classroom, start_session, submit_answer,
        },
    },
};

#[path = "common/mod.rs"]
mod common;

async fn classroom_of_two(backend: &common::TestBackend) -> uuid::Uuid {
    let classroom = create_classroom(
        backend.db.clone(),
        "alice".to_string(),
        "quiz-room".to_string(),
        String::new(),
        "General".to_string(),
        Some(2),
    )
    .await
    .expect("classroom creation should succeed");

    join_classroom(
        backend.db.clone(),
        backend.locks.clone(),
        classroom.id,
        "bob".to_string(),
    )
    .await
    .expect("bob should join the classroom");

    classroom.id
}

#[tokio::test]
async fn team_quiz_end_to_end() {
    let backend = common::backend();
    let classroom_id = classroom_of_two(&backend).await;

    let session = create_session(
        backend.db.clone(),
        backend.db.clone(),
        classroom_id,
        "alice".to_string(),
        vec![
            common::question("first question", &["A", "B", "C"], 0),
            common::question("second question", &["A", "B", "C"], 1),
        ],
        None,
        true,
    )
    .await
    .expect("session creation should succeed");

    assert_eq!(session.state, QuizState::Waiting);
    assert_eq!(session.scores.get("alice"), Some(&0));

    let session_id = session.id;

    join_session(
        backend.db.clone(),
        backend.db.clone(),
        backend.locks.clone(),
        session_id,
        "bob".to_string(),
    )
    .await
    .expect("bob should join while waiting");

    let session = start_session(
        backend.db.clone(),
        backend.locks.clone(),
        session_id,
        "alice".to_string(),
    )
    .await
    .expect("creator should start the session");

    assert_eq!(session.state, QuizState::Active);
    assert!(session.started_at.is_some());

    let outcome = submit_answer(
        backend.db.clone(),
        backend.locks.clone(),
        session_id,
        "bob".to_string(),
        "A".to_string(),
    )
    .await
    .expect("bob's submission should be accepted");

    assert!(outcome.correct);
    assert!(outcome.has_next_question);
    assert!(!outcome.completed);

    let outcome = submit_answer(
        backend.db.clone(),
        backend.locks.clone(),
        session_id,
        "alice".to_string(),
        "X".to_string(),
    )
    .await
    .expect("alice's submission should be accepted");

    assert!(!outcome.correct);
    assert!(!outcome.has_next_question);
    assert!(outcome.completed);

    let session = get_session(backend.db.clone(), session_id, "alice".to_string())
        .await
        .expect("participants can read a completed session");

    assert_eq!(session.state, QuizState::Completed);
    assert_eq!(session.current_question, 2);
    assert_eq!(session.scores.get("bob"), Some(&1));
    assert_eq!(session.scores.get("alice"), Some(&0));
    assert!(session.completed_at.is_some());
}

#[tokio::test]
async fn completed_session_rejects_further_answers() {
    let backend = common::backend();
    let classroom_id = classroom_of_two(&backend).await;

    let session = create_session(
        backend.db.clone(),
        backend.db.clone(),
        classroom_id,
        "alice".to_string(),
        vec![common::question("only question", &["A", "B"], 0)],
        None,
        true,
    )
    .await
    .expect("session creation should succeed");

    start_session(
        backend.db.clone(),
        backend.locks.clone(),
        session.id,
        "alice".to_string(),
    )
    .await
    .expect("start should succeed");

    submit_answer(
        backend.db.clone(),
        backend.locks.clone(),
        session.id,
        "alice".to_string(),
        "A".to_string(),
    )
    .await
    .expect("final answer should complete the session");

    let result = submit_answer(
        backend.db.clone(),
        backend.locks.clone(),
        session.id,
        "alice".to_string(),
        "A".to_string(),
    )
    .await;

    assert!(matches!(result, Err(QuizError::NotActive)));

    let result = join_session(
        backend.db.clone(),
        backend.db.clone(),
        backend.locks.clone(),
        session.id,
        "bob".to_string(),
    )
    .await;

    assert!(matches!(result, Err(QuizError::NotWaiting)));
}

#[tokio::test]
async fn session_lifecycle_permissions() {
    let backend = common::backend();
    let classroom_id = classroom_of_two(&backend).await;

    let session = create_session(
        backend.db.clone(),
        backend.db.clone(),
        classroom_id,
        "alice".to_string(),
        vec![common::question("q", &["A", "B"], 0)],
        Some(60),
        false,
    )
    .await
    .expect("session creation should succeed");

    let result = start_session(
        backend.db.clone(),
        backend.locks.clone(),
        session.id,
        "bob".to_string(),
    )
    .await;

    assert!(matches!(result, Err(QuizError::NotCreator)));

    let result = submit_answer(
        backend.db.clone(),
        backend.locks.clone(),
        session.id,
        "alice".to_string(),
        "A".to_string(),
    )
    .await;

    assert!(matches!(result, Err(QuizError::NotActive)));

    let result = join_session(
        backend.db.clone(),
        backend.db.clone(),
        backend.locks.clone(),
        session.id,
        "carol".to_string(),
    )
    .await;

    assert!(matches!(result, Err(QuizError::NotClassroomMember)));

    let result = get_session(backend.db.clone(), session.id, "bob".to_string()).await;

    assert!(matches!(result, Err(QuizError::NotParticipant)));

    start_session(
        backend.db.clone(),
        backend.locks.clone(),
        session.id,
        "alice".to_string(),
    )
    .await
    .expect("creator should start the session");

    let result = start_session(
        backend.db.clone(),
        backend.locks.clone(),
        session.id,
        "alice".to_string(),
    )
    .await;

    assert!(matches!(result, Err(QuizError::NotWaiting)));
}

#[tokio::test]
async fn session_join_snapshot_survives_roster_changes() {
    let backend = common::backend();
    let classroom_id = classroom_of_two(&backend).await;

    let session = create_session(
        backend.db.clone(),
        backend.db.clone(),
        classroom_id,
        "alice".to_string(),
        vec![common::question("q", &["A", "B"], 0)],
        None,
        true,
    )
    .await
    .expect("session creation should succeed");

    join_session(
        backend.db.clone(),
        backend.db.clone(),
        backend.locks.clone(),
        session.id,
        "bob".to_string(),
    )
    .await
    .expect("bob should join while a classroom member");

    // Leaving the classroom afterwards does not retract the session seat.
    leave_classroom(
        backend.db.clone(),
        backend.locks.clone(),
        classroom_id,
        "bob".to_string(),
    )
    .await
    .expect("bob should leave the classroom");

    start_session(
        backend.db.clone(),
        backend.locks.clone(),
        session.id,
        "alice".to_string(),
    )
    .await
    .expect("start should succeed");

    let outcome = submit_answer(
        backend.db.clone(),
        backend.locks.clone(),
        session.id,
        "bob".to_string(),
        "A".to_string(),
    )
    .await
    .expect("bob should still be able to answer");

    assert!(outcome.correct);
}

#[tokio::test]
async fn concurrent_submissions_never_lose_an_increment() {
    let backend = common::backend();
    let classroom_id = classroom_of_two(&backend).await;

    // Both questions share the same correct option so each submission is
    // correct no matter which question it lands on.
    let session = create_session(
        backend.db.clone(),
        backend.db.clone(),
        classroom_id,
        "alice".to_string(),
        vec![
            common::question("q1", &["A", "B"], 0),
            common::question("q2", &["A", "C"], 0),
        ],
        None,
        true,
    )
    .await
    .expect("session creation should succeed");

    let session_id = session.id;

    join_session(
        backend.db.clone(),
        backend.db.clone(),
        backend.locks.clone(),
        session_id,
        "bob".to_string(),
    )
    .await
    .expect("bob should join");

    start_session(
        backend.db.clone(),
        backend.locks.clone(),
        session_id,
        "alice".to_string(),
    )
    .await
    .expect("start should succeed");

    let alice_task = {
        let db = backend.db.clone();
        let locks = backend.locks.clone();
        tokio::spawn(async move {
            submit_answer(db, locks, session_id, "alice".to_string(), "A".to_string()).await
        })
    };

    let bob_task = {
        let db = backend.db.clone();
        let locks = backend.locks.clone();
        tokio::spawn(async move {
            submit_answer(db, locks, session_id, "bob".to_string(), "A".to_string()).await
        })
    };

    let alice_outcome = alice_task
        .await
        .expect("alice task should not panic")
        .expect("alice submission should succeed");
    let bob_outcome = bob_task
        .await
        .expect("bob task should not panic")
        .expect("bob submission should succeed");

    assert!(alice_outcome.correct);
    assert!(bob_outcome.correct);

    // Exactly one of the two submissions closed the session.
    assert_eq!(
        [alice_outcome, bob_outcome]
            .iter()
            .filter(|outcome| outcome.completed)
            .count(),
        1
    );

    let session = get_session(backend.db.clone(), session_id, "alice".to_string())
        .await
        .expect("session should be readable");

    assert_eq!(session.current_question, 2);
    assert_eq!(session.state, QuizState::Completed);
    assert_eq!(session.scores.get("alice"), Some(&1));
    assert_eq!(session.scores.get("bob"), Some(&1));
}

#[tokio::test]
async fn registry_indexes_sessions_by_classroom() {
    let backend = common::backend();
    let first_classroom = classroom_of_two(&backend).await;

    let other = create_classroom(
        backend.db.clone(),
        "carol".to_string(),
        "other-room".to_string(),
        String::new(),
        "History".to_string(),
        None,
    )
    .await
    .expect("second classroom creation should succeed");

    for _ in 0..2 {
        create_session(
            backend.db.clone(),
            backend.db.clone(),
            first_classroom,
            "alice".to_string(),
            vec![common::question("q", &["A", "B"], 0)],
            None,
            true,
        )
        .await
        .expect("session creation should succeed");
    }

    create_session(
        backend.db.clone(),
        backend.db.clone(),
        other.id,
        "carol".to_string(),
        vec![common::question("q", &["A", "B"], 0)],
        None,
        true,
    )
    .await
    .expect("session creation should succeed");

    let for_first = sessions_for_classroom(backend.db.clone(), first_classroom)
        .await
        .expect("classroom index should work");

    assert_eq!(for_first.len(), 2);
    assert!(for_first.iter().all(|s| s.classroom_id == first_classroom));

    let all = list_sessions(backend.db.clone())
        .await
        .expect("listing should work");

    assert_eq!(all.len(), 3);
}
