use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::{
    domain::classroom::{Classroom, DEFAULT_CAPACITY},
    use_cases::{classroom_database::ClassroomDatabase, entity_locks::EntityLocks},
};

type ClassroomResult<T> = Result<T, ClassroomError>;

pub async fn create_classroom(
    db: Arc<impl ClassroomDatabase>,
    owner: String,
    name: String,
    description: String,
    subject: String,
    capacity: Option<u32>,
) -> ClassroomResult<Classroom> {
    if name.trim().is_empty() {
        return Err(ClassroomError::NameRequired);
    }

    let classroom = Classroom {
        id: Uuid::new_v4(),
        name,
        description,
        subject,
        owner: owner.clone(),
        members: vec![owner],
        capacity: capacity.unwrap_or(DEFAULT_CAPACITY),
        active: true,
        created_at: Utc::now(),
    };

    db.insert_classroom(classroom.clone())
        .await
        .map_err(|err| ClassroomError::DatabaseError(err.to_string()))?;

    info!(
        "classroom {} created by {}",
        classroom.id, classroom.owner
    );

    Ok(classroom)
}

pub async fn get_classroom(
    db: Arc<impl ClassroomDatabase>,
    classroom_id: Uuid,
) -> ClassroomResult<Classroom> {
    db.classroom_by_id(classroom_id)
        .await
        .map_err(|err| ClassroomError::DatabaseError(err.to_string()))?
        .ok_or(ClassroomError::NotFound)
}

pub async fn list_classrooms(db: Arc<impl ClassroomDatabase>) -> ClassroomResult<Vec<Classroom>> {
    db.all_classrooms()
        .await
        .map_err(|err| ClassroomError::DatabaseError(err.to_string()))
}

pub async fn join_classroom(
    db: Arc<impl ClassroomDatabase>,
    locks: Arc<EntityLocks>,
    classroom_id: Uuid,
    member: String,
) -> ClassroomResult<Classroom> {
    let _guard = locks.acquire(classroom_id).await;

    let mut classroom = db
        .classroom_by_id(classroom_id)
        .await
        .map_err(|err| ClassroomError::DatabaseError(err.to_string()))?
        .ok_or(ClassroomError::NotFound)?;

    if classroom.is_member(&member) {
        return Err(ClassroomError::AlreadyMember);
    }

    if classroom.is_full() {
        return Err(ClassroomError::Full);
    }

    db.add_member(classroom_id, member.clone())
        .await
        .map_err(|err| ClassroomError::DatabaseError(err.to_string()))?;

    classroom.members.push(member);

    Ok(classroom)
}

pub async fn leave_classroom(
    db: Arc<impl ClassroomDatabase>,
    locks: Arc<EntityLocks>,
    classroom_id: Uuid,
    member: String,
) -> ClassroomResult<()> {
    let _guard = locks.acquire(classroom_id).await;

    let classroom = db
        .classroom_by_id(classroom_id)
        .await
        .map_err(|err| ClassroomError::DatabaseError(err.to_string()))?
        .ok_or(ClassroomError::NotFound)?;

    if !classroom.is_member(&member) {
        return Err(ClassroomError::NotMember);
    }

    db.remove_member(classroom_id, member.clone())
        .await
        .map_err(|err| ClassroomError::DatabaseError(err.to_string()))?;

    let remaining: Vec<&String> = classroom.members.iter().filter(|m| **m != member).collect();

    if remaining.is_empty() {
        db.delete_classroom(classroom_id)
            .await
            .map_err(|err| ClassroomError::DatabaseError(err.to_string()))?;

        info!("classroom {classroom_id} deleted after its last member left");
    } else if classroom.owner == member {
        let next_owner = remaining[0].clone();

        db.set_owner(classroom_id, next_owner.clone())
            .await
            .map_err(|err| ClassroomError::DatabaseError(err.to_string()))?;

        info!("classroom {classroom_id} ownership transferred to {next_owner}");
    }

    Ok(())
}

pub async fn delete_classroom(
    db: Arc<impl ClassroomDatabase>,
    locks: Arc<EntityLocks>,
    classroom_id: Uuid,
    requester: String,
) -> ClassroomResult<()> {
    let _guard = locks.acquire(classroom_id).await;

    let classroom = db
        .classroom_by_id(classroom_id)
        .await
        .map_err(|err| ClassroomError::DatabaseError(err.to_string()))?
        .ok_or(ClassroomError::NotFound)?;

    if classroom.owner != requester {
        return Err(ClassroomError::NotOwner("delete the classroom"));
    }

    db.delete_classroom(classroom_id)
        .await
        .map_err(|err| ClassroomError::DatabaseError(err.to_string()))?;

    info!("classroom {classroom_id} deleted by its owner");

    Ok(())
}

pub async fn add_member(
    db: Arc<impl ClassroomDatabase>,
    locks: Arc<EntityLocks>,
    classroom_id: Uuid,
    requester: String,
    target: String,
) -> ClassroomResult<()> {
    let _guard = locks.acquire(classroom_id).await;

    let classroom = db
        .classroom_by_id(classroom_id)
        .await
        .map_err(|err| ClassroomError::DatabaseError(err.to_string()))?
        .ok_or(ClassroomError::NotFound)?;

    if classroom.owner != requester {
        return Err(ClassroomError::NotOwner("add members"));
    }

    if classroom.is_member(&target) {
        return Err(ClassroomError::AlreadyMember);
    }

    if classroom.is_full() {
        return Err(ClassroomError::Full);
    }

    db.add_member(classroom_id, target)
        .await
        .map_err(|err| ClassroomError::DatabaseError(err.to_string()))?;

    Ok(())
}

pub async fn remove_member(
    db: Arc<impl ClassroomDatabase>,
    locks: Arc<EntityLocks>,
    classroom_id: Uuid,
    requester: String,
    target: String,
) -> ClassroomResult<()> {
    let _guard = locks.acquire(classroom_id).await;

    let classroom = db
        .classroom_by_id(classroom_id)
        .await
        .map_err(|err| ClassroomError::DatabaseError(err.to_string()))?
        .ok_or(ClassroomError::NotFound)?;

    if classroom.owner != requester {
        return Err(ClassroomError::NotOwner("remove members"));
    }

    if !classroom.is_member(&target) {
        return Err(ClassroomError::NotMember);
    }

    if target == classroom.owner {
        return Err(ClassroomError::OwnerRemoval);
    }

    db.remove_member(classroom_id, target)
        .await
        .map_err(|err| ClassroomError::DatabaseError(err.to_string()))?;

    Ok(())
}

#[derive(Error, Debug)]
pub enum ClassroomError {
    #[error("classroom name is required")]
    NameRequired,
    #[error("classroom not found")]
    NotFound,
    #[error("already a member of this classroom")]
    AlreadyMember,
    #[error("not a member of this classroom")]
    NotMember,
    #[error("classroom is full")]
    Full,
    #[error("only the classroom owner can {0}")]
    NotOwner(&'static str),
    #[error("the classroom owner cannot be removed")]
    OwnerRemoval,
    #[error("database error: {0}")]
    DatabaseError(String),
}
