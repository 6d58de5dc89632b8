/// Authentication primitives for TaskFlow
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Signed, expiring bearer token generation and validation
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with per-hash random salt
/// - **Bearer Tokens**: HS256 signing with configurable expiration
/// - **Constant-time Comparison**: Verification uses constant-time operations
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::auth::password::{hash_password, verify_password};
/// use taskflow_shared::auth::jwt::{create_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), chrono::Duration::hours(24));
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod password;
