//! Login form, session cookie and the gate in front of the lookup routes.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::{info, warn};

use crate::state::AppState;

pub const SESSION_COOKIE_NAME: &str = "reelfetch_session";

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn login_page(message: Option<&str>) -> Html<String> {
    let notice = message
        .map(|m| format!("<p class=\"error\">{m}</p>"))
        .unwrap_or_default();
    Html(format!(
        "<!doctype html>\n<html><head><title>Log in</title></head><body>\n\
         {notice}\
         <form method=\"post\" action=\"/login\">\n\
         <label>Username <input name=\"username\" autocomplete=\"username\"></label>\n\
         <label>Password <input name=\"password\" type=\"password\" autocomplete=\"current-password\"></label>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>\n</body></html>\n"
    ))
}

pub async fn login_form() -> Html<String> {
    login_page(None)
}

pub async fn login(State(state): State<AppState>, jar: CookieJar, Form(form): Form<LoginForm>) -> Response {
    if !state.users.verify(&form.username, &form.password) {
        warn!(username = %form.username, "Failed login attempt");
        return (StatusCode::UNAUTHORIZED, login_page(Some("Invalid credentials"))).into_response();
    }

    state.sessions.purge_expired();
    let token = state.sessions.create(&form.username);
    let cookie = Cookie::build((SESSION_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(state.sessions.ttl().num_seconds()))
        .build();

    info!(username = %form.username, "User logged in");
    (jar.add(cookie), Redirect::to("/imdb/")).into_response()
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        state.sessions.remove(cookie.value());
    }

    let cookie = Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();

    (jar.remove(cookie), Redirect::to("/login"))
}

/// Send unauthenticated callers to the login form.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request<Body>,
    next: Next,
) -> Response {
    let token = jar.get(SESSION_COOKIE_NAME).map(|c| c.value().to_string());

    if state.auth.is_authorized(token.as_deref()) {
        next.run(request).await
    } else {
        Redirect::to("/login").into_response()
    }
}
