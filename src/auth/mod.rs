//! User authentication: cookie handling, the auth middleware and the
//! sign-up/sign-in endpoints.

pub(crate) mod cookie;
mod endpoints;
mod middleware;

pub(crate) use endpoints::{session, sign_in, sign_out, sign_up};
pub(crate) use middleware::auth_guard;
