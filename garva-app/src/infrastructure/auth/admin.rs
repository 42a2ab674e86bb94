use garva_errors::AppError;

/// Session key flagging an authenticated admin.
pub const ADMIN_SESSION_KEY: &str = "garva_admin";

/// Single admin account configured through the environment.
#[derive(Clone)]
pub struct AdminAuth {
    username: String,
    password: String,
}

impl AdminAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn verify(&self, username: &str, password: &str) -> Result<(), AppError> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "username and password required".to_string(),
            ));
        }

        // Evaluate both so timing doesn't reveal which one was wrong.
        let username_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());
        let password_ok = constant_time_eq(password.as_bytes(), self.password.as_bytes());

        if username_ok & password_ok {
            Ok(())
        } else {
            tracing::warn!("Failed admin login for {:?}", username);
            Err(AppError::Unauthorized)
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify() {
        let auth = AdminAuth::new("alexander", "hemligt");
        assert!(auth.verify("alexander", "hemligt").is_ok());
        assert_eq!(auth.verify("alexander", "fel"), Err(AppError::Unauthorized));
        assert_eq!(auth.verify("någon", "hemligt"), Err(AppError::Unauthorized));
        assert!(matches!(auth.verify("", ""), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hemligt", b"hemligt"));
        assert!(!constant_time_eq(b"hemligt", b"hemligT"));
        assert!(!constant_time_eq(b"hem", b"hemligt"));
        assert!(constant_time_eq(b"", b""));
    }
}
