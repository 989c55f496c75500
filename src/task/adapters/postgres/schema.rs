//! Diesel schema for task list persistence.

diesel::table! {
    /// Owner-scoped task documents with embedded sub-tasks.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Owning user identifier.
        owner_id -> Uuid,
        /// Task text.
        text -> Text,
        /// Completion flag.
        completed -> Bool,
        /// Ordered sub-task array.
        sub_tasks -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
