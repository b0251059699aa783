//! Diesel schema for identifier counters.

diesel::table! {
    /// One row per counter category.
    counters (counter_type) {
        /// Counter category tag (`TASK`, `RUN`).
        #[max_length = 32]
        counter_type -> Varchar,
        /// Last value handed out; 0 before the first allocation.
        counter_value -> Int8,
    }
}
