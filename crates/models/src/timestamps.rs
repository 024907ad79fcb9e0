//! Audit timestamps shared by every catalog table.
use chrono::Utc;
use sea_orm::{prelude::DateTimeWithTimeZone, ActiveValue, Set};

pub fn now() -> DateTimeWithTimeZone { Utc::now().into() }

/// `created_at` is written once on insert; `updated_at` on every save.
pub fn touch(
    created_at: &mut ActiveValue<DateTimeWithTimeZone>,
    updated_at: &mut ActiveValue<DateTimeWithTimeZone>,
    insert: bool,
) {
    let ts = now();
    if insert && !created_at.is_set() {
        *created_at = Set(ts);
    }
    *updated_at = Set(ts);
}
