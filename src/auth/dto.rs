use serde::{Deserialize, Serialize};

use super::repo::PublicUser;

/// Request body for user registration, including the two free-text security
/// answers used by password recovery.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub q1: String,
    pub q2: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
    pub q1: String,
    pub q2: String,
    #[serde(rename = "newPass")]
    pub new_pass: String,
}

/// Fields are optional so a missing one maps to the contract's 400 rather
/// than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub count: usize,
    pub users: Vec<PublicUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forgot_password_uses_the_wire_field_name() {
        let body = r#"{"email":"a@b.c","q1":"x","q2":"y","newPass":"secret123"}"#;
        let req: ForgotPasswordRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.new_pass, "secret123");
    }

    #[test]
    fn delete_request_tolerates_missing_fields() {
        let req: DeleteAccountRequest = serde_json::from_str("{}").unwrap();
        assert!(req.email.is_none());
        assert!(req.password.is_none());
    }
}
