//! Diesel schema for review task persistence.

diesel::table! {
    /// Active review tasks.
    review_tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning chat identifier.
        chat_id -> Int8,
        /// Task name, unique per chat.
        #[max_length = 255]
        name -> Varchar,
        /// Date of the most recent review.
        last_review_date -> Date,
        /// Interval weighting factor.
        acceptance_rate -> Float8,
        /// Derived next review date.
        next_review_date -> Date,
        /// Lifecycle state.
        #[max_length = 20]
        state -> Varchar,
        /// Reminder message identifier while reminded.
        message_id -> Nullable<Int8>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Completed review tasks.
    archived_review_tasks (id) {
        /// Identifier of the original task.
        id -> Uuid,
        /// Owning chat identifier.
        chat_id -> Int8,
        /// Task name.
        #[max_length = 255]
        name -> Varchar,
        /// Last review date at completion.
        last_review_date -> Date,
        /// Acceptance rate at completion.
        acceptance_rate -> Float8,
        /// Review date of the acknowledged reminder.
        next_review_date -> Date,
        /// Acknowledged reminder message identifier.
        message_id -> Nullable<Int8>,
        /// Creation timestamp of the original task.
        created_at -> Timestamptz,
        /// Completion timestamp.
        archived_at -> Timestamptz,
    }
}
