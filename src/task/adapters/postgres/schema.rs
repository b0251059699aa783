//! Diesel schema for task persistence.

diesel::table! {
    /// Stored SQL tasks in insertion order.
    tasks (seq) {
        /// Storage row identity; only used for ordering.
        seq -> Int8,
        /// Allocated task identifier.
        #[max_length = 32]
        task_id -> Varchar,
        /// Free-text description.
        task_description -> Text,
        /// Logical database name resolved against environment configs.
        #[max_length = 255]
        db_name -> Varchar,
        /// SQL text executed verbatim.
        sql_query -> Text,
        /// Declared statement kind.
        #[max_length = 16]
        query_type -> Varchar,
        /// Task author.
        #[max_length = 255]
        created_by -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Nullable<Timestamptz>,
    }
}
