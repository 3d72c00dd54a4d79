use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use log::debug;

use crate::user;

/// Resolves the session cookie into the current user's profile and exposes it
/// to handlers as an `Extension<Profile>`.
pub async fn current_user(
    user_service: State<user::Service>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> crate::Result<Response> {
    let email = jar
        .get(user::SESSION_COOKIE)
        .map(|c| c.value().to_owned())
        .ok_or(user::Error::Unauthorized)?;

    let profile = user_service.find_by_email(&email).await?;
    debug!("resolved session of user {}", profile.id());

    req.extensions_mut().insert(profile);

    Ok(next.run(req).await)
}
