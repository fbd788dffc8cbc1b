/// Two neighbouring values in sorted order share a rank when they differ by
/// at most this much.
///
/// Only the immediate predecessor is compared, so a long run of values that
/// each creep up by less than the tolerance collapses into a single rank even
/// when the first and last differ by far more. Price per area for realistic
/// pizzas sits around 0.005..0.1, so 1e-5 only merges offers that are the same
/// deal up to rounding.
pub const TIE_TOLERANCE: f64 = 1e-5;

/// Upper bound of the value-rank scale. Everything past the fifth distinct
/// group lands in the same "worst" bucket.
pub const MAX_VALUE_RANK: u8 = 6;

/// Query parameter carrying the encoded entry list in a share link.
pub const SHARE_QUERY_PARAM: &str = "data";
