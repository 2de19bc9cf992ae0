use std::ops::RangeInclusive;

/// Allowed range for a division's display order
pub const DIVISION_ORDER_RANGE: RangeInclusive<i64> = 1..=100;

/// Allowed range for a cost code's order number
pub const COST_CODE_ORDER_RANGE: RangeInclusive<i64> = 1..=200;

/// Number of levels a cost-code tree may have (root + two nested levels)
pub const MAX_COST_CODE_LEVELS: usize = 3;

/// Environment variable that overrides the database location
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
