use actix_web::{HttpResponse, web};
use log::info;
use serde::{Deserialize, Serialize};

use crate::AppData;
use crate::coerce::{lenient_i64, lenient_text};
use crate::documents::{UserCollection, UserDocument};

use super::errors::{ServiceError, ServiceResult};

const DEFAULT_CLEARANCE: i64 = 1;

#[derive(Debug, Deserialize)]
pub struct SignupInput {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub clearance: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// The public part of an account, the password never leaves the store.
#[derive(Debug, PartialEq, Serialize)]
pub struct UserSummary {
    pub name: Option<String>,
    pub email: String,
    pub clearance: i64,
}

impl From<UserDocument> for UserSummary {
    fn from(doc: UserDocument) -> Self {
        UserSummary {
            name: doc.name,
            email: doc.email,
            clearance: doc.clearance.unwrap_or(DEFAULT_CLEARANCE),
        }
    }
}

#[derive(Serialize)]
struct SignupResponse {
    message: &'static str,
    #[serde(flatten)]
    user: UserSummary,
}

#[derive(Serialize)]
struct LoginResponse {
    message: &'static str,
    user: UserSummary,
}

fn required(value: Option<String>, field: &str) -> ServiceResult<String> {
    value.ok_or_else(|| ServiceError::BadRequest(format!("Missing field: {}", field)))
}

/// Stores a new account unless one with the same email already exists.
///
/// The check and the insert are not atomic, two concurrent signups with the
/// same email can both succeed.
pub fn register_user(users: &dyn UserCollection, input: SignupInput) -> ServiceResult<UserDocument> {
    let email = required(input.email, "email")?;
    let password = required(input.password, "password")?;
    let clearance = input.clearance
        .ok_or_else(|| ServiceError::BadRequest("Missing field: clearance".to_string()))?;

    if !users.find_by_email(&email)?.is_empty() {
        return Err(ServiceError::AlreadyPresent("Email".to_string()));
    }

    let user = UserDocument {
        name: input.name,
        email,
        password,
        clearance: Some(clearance),
    };
    let id = users.add(&user)?;
    info!("User added with document id {}", id);
    Ok(user)
}

/// Checks the credentials against the first account stored with that email.
/// Passwords are compared as plain text.
pub fn authenticate(users: &dyn UserCollection, input: LoginInput) -> ServiceResult<UserDocument> {
    let email = required(input.email, "email")?;
    let password = required(input.password, "password")?;

    let user = users.find_by_email(&email)?
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::NotFound("User".to_string()))?
        .document;

    if user.password != password {
        Err(ServiceError::WrongPassword)
    } else {
        Ok(user)
    }
}

pub async fn signup(ctx: web::Data<AppData>, data: web::Json<SignupInput>) -> ServiceResult<HttpResponse> {
    let input = data.into_inner();
    let user = web::block(move || register_user(ctx.users.as_ref(), input))
        .await
        .map_err(|x| ServiceError::from(x).during("Failed to sign up"))?;

    Ok(HttpResponse::Ok().json(SignupResponse {
        message: "Signup successful!",
        user: user.into(),
    }))
}

pub async fn login(ctx: web::Data<AppData>, data: web::Json<LoginInput>) -> ServiceResult<HttpResponse> {
    let input = data.into_inner();
    let user = web::block(move || authenticate(ctx.users.as_ref(), input))
        .await
        .map_err(|x| ServiceError::from(x).during("Login failed"))?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful!",
        user: user.into(),
    }))
}
