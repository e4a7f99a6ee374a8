use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::Environment;

pub const SESSION_COOKIE: &str = "token";

/// Writes and clears the session credential cookie.
///
/// Production-like deployments serve the frontend from another origin over
/// TLS, so the cookie must be `Secure` and `SameSite=None` to travel on
/// credentialed cross-site requests. Local development keeps it `Strict`.
#[derive(Debug, Clone, Copy)]
pub struct SessionCookies {
    cross_site: bool,
}

impl SessionCookies {
    pub fn new(environment: Environment) -> Self {
        Self {
            cross_site: environment.is_production_like(),
        }
    }

    pub fn attach(&self, jar: CookieJar, credential: String) -> CookieJar {
        jar.add(self.build(credential))
    }

    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        let mut cookie = self.build(String::new());
        cookie.make_removal();
        jar.add(cookie)
    }

    pub fn read(jar: &CookieJar) -> Option<String> {
        jar.get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    fn build(&self, value: String) -> Cookie<'static> {
        let same_site = if self.cross_site { SameSite::None } else { SameSite::Strict };
        Cookie::build((SESSION_COOKIE, value))
            .http_only(true)
            .secure(self.cross_site)
            .same_site(same_site)
            .path("/")
            .build()
    }
}
