pub mod rate_limit;
pub mod request_id;

pub use rate_limit::{enforce_rate_limit, RateLimiter};
pub use request_id::{propagate_request_id, request_span, RequestId};
