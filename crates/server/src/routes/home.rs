//! Home route: forwards to the record list or to login.

use axum::response::Redirect;

use crate::middleware::OptionalAuth;

/// Redirect `/` based on authentication state.
pub async fn home(OptionalAuth(user): OptionalAuth) -> Redirect {
    if user.is_some() {
        Redirect::to("/validades")
    } else {
        Redirect::to("/auth/login")
    }
}
