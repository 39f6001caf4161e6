#[derive(Debug)]
pub enum ApplicationError {
    NotFound,
    /// The short code once resolved to a live record but its expiry passed.
    /// Distinct from NotFound so clients can tell a dead link from a typo.
    Expired,
    InternalError(String),
    DatabaseError(String),
    BadRequest(String),
    Unauthorized,
    /// Unique-constraint collision; callers that generate identifiers retry.
    Conflict,
}
