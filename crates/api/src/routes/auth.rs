//! Credential lifecycle endpoints.

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use serde::Deserialize;
use serde_json::json;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::response::ApiResponse;
use crate::services::auth::AuthService;
use crate::state::AppState;
use crate::validate::{ApiJson, Validator};

/// Create the auth routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/send-email-code", post(send_email_code))
        .route("/verify-email", post(verify_email))
        .route("/send-phone-number-code", post(send_phone_number_code))
        .route("/verify-phone-number", post(verify_phone_number))
        .route("/add-password", post(add_password))
        .route("/add-information", post(add_information))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

#[derive(Deserialize)]
struct RegisterRequest {
    email: Option<String>,
}

async fn register(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<RegisterRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/register");
    let email = v.email("email", form.email.as_deref());
    v.finish()?;
    let email = email.expect("validated");

    let auth = AuthService::new(state.pool(), state.mailer());
    let user = auth.register(&email).await?;

    Ok(ApiResponse::created(
        "User registered successfully",
        json!({
            "id": user.id,
            "email": user.email.as_str(),
            "session_token": user.session_token,
        }),
        Some("/verify-email"),
    ))
}

#[derive(Deserialize)]
struct SendEmailCodeRequest {
    email: Option<String>,
}

async fn send_email_code(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<SendEmailCodeRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/send-email-code");
    let email = v.email("email", form.email.as_deref());
    v.finish()?;
    let email = email.expect("validated");

    let auth = AuthService::new(state.pool(), state.mailer());
    auth.send_email_code(email.as_str()).await?;

    Ok(ApiResponse::created(
        "Verification code sent",
        json!({}),
        Some("/verify-email"),
    ))
}

#[derive(Deserialize)]
struct VerifyEmailRequest {
    email: Option<String>,
    code: Option<String>,
    session: Option<String>,
}

async fn verify_email(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<VerifyEmailRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/verify-email");
    let email = v.email("email", form.email.as_deref());
    let code = v.code("code", form.code.as_deref());
    let session = v.required("session", form.session.as_deref());
    v.finish()?;
    let (email, code, session) = (
        email.expect("validated"),
        code.expect("validated"),
        session.expect("validated"),
    );

    let auth = AuthService::new(state.pool(), state.mailer());
    let user = auth
        .verify_email(email.as_str(), code.as_str(), session)
        .await?;

    Ok(ApiResponse::created(
        "Email verified successfully",
        json!({ "id": user.id, "email": user.email.as_str() }),
        Some("/verify-phone-number"),
    ))
}

#[derive(Deserialize)]
struct SendPhoneCodeRequest {
    email: Option<String>,
    phone_number: Option<String>,
}

async fn send_phone_number_code(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<SendPhoneCodeRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/verify-phone-number");
    let email = v.email("email", form.email.as_deref());
    let phone = v.phone("phone_number", form.phone_number.as_deref());
    v.finish()?;
    let (email, phone) = (email.expect("validated"), phone.expect("validated"));

    let auth = AuthService::new(state.pool(), state.mailer());
    auth.send_phone_code(email.as_str(), phone.as_str()).await?;

    Ok(ApiResponse::created(
        "Verification code sent",
        json!({}),
        Some("/verify-phone-number"),
    ))
}

#[derive(Deserialize)]
struct VerifyPhoneRequest {
    phone_number: Option<String>,
    code: Option<String>,
    session: Option<String>,
}

async fn verify_phone_number(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<VerifyPhoneRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/verify-phone-number");
    let phone = v.phone("phone_number", form.phone_number.as_deref());
    let code = v.code("code", form.code.as_deref());
    let session = v.required("session", form.session.as_deref());
    v.finish()?;
    let (phone, code, session) = (
        phone.expect("validated"),
        code.expect("validated"),
        session.expect("validated"),
    );

    let auth = AuthService::new(state.pool(), state.mailer());
    let user = auth
        .verify_phone(phone.as_str(), code.as_str(), session)
        .await?;

    Ok(ApiResponse::created(
        "Phone number verified successfully",
        json!({ "id": user.id, "phone_number": user.phone_number }),
        Some("/add-password"),
    ))
}

#[derive(Deserialize)]
struct AddPasswordRequest {
    password: Option<String>,
    confirm_password: Option<String>,
    session: Option<String>,
}

async fn add_password(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<AddPasswordRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/add-password");
    let password = v.required("password", form.password.as_deref());
    v.same(
        "confirm_password",
        form.confirm_password.as_deref(),
        "password",
        form.password.as_deref(),
    );
    let session = v.required("session", form.session.as_deref());
    v.finish()?;
    let (password, session) = (password.expect("validated"), session.expect("validated"));

    let auth = AuthService::new(state.pool(), state.mailer());
    auth.add_password(session, password).await?;

    Ok(ApiResponse::created(
        "Password saved successfully",
        json!({}),
        Some("/add-information"),
    ))
}

#[derive(Deserialize)]
struct AddInformationRequest {
    firstname: Option<String>,
    lastname: Option<String>,
    username: Option<String>,
    session: Option<String>,
}

async fn add_information(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<AddInformationRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/add-information");
    let firstname = v.required("firstname", form.firstname.as_deref());
    let lastname = v.required("lastname", form.lastname.as_deref());
    let username = v.required("username", form.username.as_deref());
    let session = v.required("session", form.session.as_deref());
    v.finish()?;
    let (firstname, lastname, username, session) = (
        firstname.expect("validated"),
        lastname.expect("validated"),
        username.expect("validated"),
        session.expect("validated"),
    );

    let auth = AuthService::new(state.pool(), state.mailer());
    let user = auth
        .add_information(session, firstname, lastname, username)
        .await?;

    Ok(ApiResponse::created(
        "Profile saved successfully",
        json!({ "id": user.id, "username": username }),
        Some("/login"),
    ))
}

#[derive(Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

async fn login(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<LoginRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/login");
    let email = v.email("email", form.email.as_deref());
    let password = v.required("password", form.password.as_deref());
    v.finish()?;
    let (email, password) = (email.expect("validated"), password.expect("validated"));

    let auth = AuthService::new(state.pool(), state.mailer());
    let (user, token) = auth.login(email.as_str(), password).await?;

    Ok(ApiResponse::created(
        "Login successful",
        json!({ "token": token, "user": user.public_json() }),
        Some("/"),
    ))
}

async fn logout(State(state): State<AppState>, CurrentUser(auth): CurrentUser) -> Result<ApiResponse> {
    AuthService::new(state.pool(), state.mailer())
        .logout(auth.user_id)
        .await?;

    Ok(ApiResponse::created(
        "Logout successful",
        json!({}),
        Some("/login"),
    ))
}

#[derive(Deserialize)]
struct ForgotPasswordRequest {
    email: Option<String>,
}

async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ForgotPasswordRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/forgot-password");
    let email = v.email("email", form.email.as_deref());
    v.finish()?;
    let email = email.expect("validated");

    let auth = AuthService::new(state.pool(), state.mailer());
    auth.forgot_password(email.as_str()).await?;

    Ok(ApiResponse::ok(
        "Password reset email sent",
        json!({}),
        Some("/reset-password"),
    ))
}

#[derive(Deserialize)]
struct ResetPasswordRequest {
    token: Option<String>,
    password: Option<String>,
    confirm_password: Option<String>,
}

async fn reset_password(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ResetPasswordRequest>,
) -> Result<ApiResponse> {
    let mut v = Validator::new("/reset-password");
    let token = v.required("token", form.token.as_deref());
    let password = v.required("password", form.password.as_deref());
    v.same(
        "confirm_password",
        form.confirm_password.as_deref(),
        "password",
        form.password.as_deref(),
    );
    v.finish()?;
    let (token, password) = (token.expect("validated"), password.expect("validated"));

    let auth = AuthService::new(state.pool(), state.mailer());
    auth.reset_password(token, password).await?;

    Ok(ApiResponse::ok(
        "Password reset successfully",
        json!({}),
        Some("/login"),
    ))
}
