use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::{Database, Repository},
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    error::{AppError, AppResult},
    models::{ApprovalStatus, RegistrationRequest, User, UserRole},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Load `user_id` and require it to hold `role`.
pub fn ensure_role(db: &Database, user_id: Uuid, role: UserRole) -> AppResult<User> {
    let user = db
        .users
        .get(&user_id)?
        .ok_or_else(|| AppError::not_found("User"))?;
    if user.role != role {
        return Err(AppError::Forbidden(format!(
            "{} role required",
            role.as_str()
        )));
    }
    Ok(user)
}

pub fn ensure_admin(db: &Database, user_id: Uuid) -> AppResult<User> {
    ensure_role(db, user_id, UserRole::Admin)
}

/// Turn an approved request into a user account.
pub(crate) fn materialize_user(db: &Database, request: &RegistrationRequest) -> AppResult<User> {
    db.users.insert(User {
        id: Uuid::new_v4(),
        name: request.name.clone(),
        email: request.email.clone(),
        phone: request.phone.clone(),
        role: request.role,
        created_at: Utc::now(),
        approval_status: match request.role {
            UserRole::Customer => None,
            _ => Some(ApprovalStatus::Approved),
        },
        license_number: request.license_number.clone(),
        shop_type: request.shop_type.clone(),
        password_hash: Some(request.password_hash.clone()),
    })
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<RegisterResponse>> {
    let RegisterRequest {
        role,
        name,
        email,
        phone,
        password,
        license_number,
        shop_type,
    } = payload;

    if [&name, &email, &phone, &password].iter().any(|v| is_blank(v)) {
        return Err(AppError::bad_request("All fields are required"));
    }
    if role == UserRole::Admin {
        return Err(AppError::Forbidden("Admin accounts cannot self-register".into()));
    }
    if role == UserRole::Driver && license_number.as_deref().is_none_or(is_blank) {
        return Err(AppError::bad_request("License number is required for drivers"));
    }
    if role == UserRole::Vendor && shop_type.as_deref().is_none_or(is_blank) {
        return Err(AppError::bad_request("Shop type is required for vendors"));
    }
    if state.db.users.by_email(&email)?.is_some() {
        return Err(AppError::bad_request("Email is already taken"));
    }

    let request = RegistrationRequest {
        id: Uuid::new_v4(),
        role,
        name,
        email,
        phone,
        password_hash: hash_password(&password)?,
        license_number,
        shop_type,
        status: ApprovalStatus::Pending,
        created_at: Utc::now(),
        reviewed_at: None,
        reviewed_by: None,
    };

    if role == UserRole::Customer {
        let user = materialize_user(&state.db, &request)?;
        if let Err(err) = log_audit(
            &state.db,
            Some(user.id),
            "user_register",
            Some("users"),
            Some(serde_json::json!({ "user_id": user.id })),
        ) {
            tracing::warn!(error = %err, "audit log failed");
        }
        tracing::info!(user_id = %user.id, "customer registered");
        return Ok(ApiResponse::success(
            "User created",
            RegisterResponse {
                auto_approved: true,
                user: Some(user),
                request_id: None,
            },
            None,
        ));
    }

    let request = state.db.registration_requests.insert(request)?;
    tracing::info!(request_id = %request.id, role = role.as_str(), "registration pending approval");
    Ok(ApiResponse::success(
        "Registration submitted and awaiting approval",
        RegisterResponse {
            auto_approved: false,
            user: None,
            request_id: Some(request.id),
        },
        None,
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let invalid = || AppError::bad_request("Invalid email or password");

    let user = state.db.users.by_email(&email)?.ok_or_else(invalid)?;
    let hash = user.password_hash.as_deref().ok_or_else(invalid)?;
    if !verify_password(&password, hash)? {
        return Err(invalid());
    }

    if let Err(err) = log_audit(
        &state.db,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse { user },
        Some(Meta::empty()),
    ))
}
