//! Diesel schema for environment configuration storage.

diesel::table! {
    /// Connection parameters per logical database and environment.
    environment_configs (config_key, environment) {
        /// Logical database name referenced by tasks.
        #[max_length = 255]
        config_key -> Varchar,
        /// Normalized environment tag.
        #[max_length = 64]
        environment -> Varchar,
        /// Target host.
        #[max_length = 255]
        host -> Varchar,
        /// Target port.
        port -> Int4,
        /// Default database selected on connect; empty for none.
        #[max_length = 255]
        database_name -> Varchar,
        /// Login name.
        #[max_length = 255]
        username -> Varchar,
        /// Login password.
        password -> Text,
        /// Last write timestamp.
        updated_at -> Timestamptz,
    }
}
