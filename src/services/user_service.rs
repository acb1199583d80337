use crate::{
    database::{MongoDB, USERS},
    models::{
        normalize_email, CreateUserRequest, CreateUserResponse, UpdateUserRequest,
        UpdatedResponse, User,
    },
    utils::{is_duplicate_key, AppError},
};
use mongodb::bson::doc;

const ALREADY_EXISTS: &str = "user already exists";

/// Inserts a new user with the fixed `user` role.
///
/// An existing email is not an error: the client gets `insertedId: null`.
pub async fn create_user(
    db: &MongoDB,
    request: CreateUserRequest,
) -> Result<CreateUserResponse, AppError> {
    let user = User::from(request);
    if user.email.is_empty() {
        return Err(AppError::InvalidRequest("email is required".to_string()));
    }

    let users = db.collection::<User>(USERS);
    if users.find_one(doc! { "email": &user.email }).await?.is_some() {
        return Ok(already_exists());
    }

    match users.insert_one(&user).await {
        Ok(result) => {
            log::info!("✅ User created: {}", user.email);
            Ok(CreateUserResponse {
                message: "user created".to_string(),
                inserted_id: result.inserted_id.as_object_id().map(|oid| oid.to_hex()),
            })
        }
        // Lost a race with a concurrent signup for the same email.
        Err(e) if is_duplicate_key(&e) => Ok(already_exists()),
        Err(e) => Err(e.into()),
    }
}

fn already_exists() -> CreateUserResponse {
    CreateUserResponse {
        message: ALREADY_EXISTS.to_string(),
        inserted_id: None,
    }
}

pub async fn get_user(db: &MongoDB, email: &str) -> Result<User, AppError> {
    db.collection::<User>(USERS)
        .find_one(doc! { "email": normalize_email(email) })
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Edits `name`, `location` and `phone`; email and role are immutable.
pub async fn update_user(
    db: &MongoDB,
    email: &str,
    request: &UpdateUserRequest,
) -> Result<UpdatedResponse, AppError> {
    let set = request.to_set_document();
    if set.is_empty() {
        return Err(AppError::InvalidRequest("No fields to update".to_string()));
    }

    let result = db
        .collection::<User>(USERS)
        .update_one(doc! { "email": normalize_email(email) }, doc! { "$set": set })
        .await?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(result.into())
}
