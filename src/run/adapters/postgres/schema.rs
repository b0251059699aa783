//! Diesel schema for run persistence.

diesel::table! {
    /// Append-only run records in insertion order.
    runs (seq) {
        /// Storage row identity; only used for ordering.
        seq -> Int8,
        /// Allocated run identifier.
        #[max_length = 32]
        run_task_id -> Varchar,
        /// Executed task.
        #[max_length = 32]
        task_id -> Varchar,
        /// Target environment tag.
        #[max_length = 64]
        environment -> Varchar,
        /// `success` or `failure`.
        #[max_length = 16]
        status -> Varchar,
        /// Outcome summary.
        message -> Text,
        /// Captured rows as a JSON array of objects, column order preserved.
        data -> Json,
        /// Whether `data` was capped.
        truncated -> Bool,
        /// Affected-row count for successful statements.
        rows_affected -> Nullable<Int8>,
        /// Derived rollback statements.
        rollback_query -> Nullable<Text>,
        /// Live-phase duration.
        execution_time_ms -> Int8,
        /// Task description at execution time.
        task_description -> Text,
        /// Executed SQL text.
        sql_query -> Text,
        /// Requester.
        #[max_length = 255]
        created_by -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
