//! Session identity for the shopping cart. The id travels in a cookie and
//! keys the cart row; the cart itself is never stored in the cookie.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "conbro_session";

/// Session id read from the request cookie, issued fresh when absent or
/// unparsable. Handlers return the jar alongside the response so a newly
/// issued id reaches the client.
pub struct CartSession {
    pub id: Uuid,
    pub jar: CookieJar,
}

#[async_trait]
impl<S> FromRequestParts<S> for CartSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state).await?;

        let existing = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

        match existing {
            Some(id) => Ok(Self { id, jar }),
            None => {
                let id = Uuid::new_v4();
                let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .build();
                Ok(Self {
                    id,
                    jar: jar.add(cookie),
                })
            }
        }
    }
}
