pub mod addresses;
pub mod health_check;
pub mod users;

/// 1-based page and limit for list endpoints, defaulting to 1/10 and both
/// floored at 1.
pub(crate) fn sanitize_pagination(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    (page.unwrap_or(1).max(1), limit.unwrap_or(10).max(1))
}
