//! Diesel schema for user account persistence.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// Internal user identifier.
        id -> Uuid,
        /// Normalized, unique email address.
        #[max_length = 320]
        email -> Varchar,
        /// Encoded PBKDF2 password hash.
        #[max_length = 255]
        password_hash -> Varchar,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}
