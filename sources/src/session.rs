//! A `Session` is what we get back from signing in, it is passed explicitly to every subsequent
//! call and consumed by signing out.
//!

use std::fmt::{Debug, Formatter};

use serde::Deserialize;

/// Result of a successful sign-in
///
#[derive(Clone, Eq, PartialEq)]
pub struct Session {
    /// Site (tenant) id, part of every URL
    pub site_id: String,
    /// Signed-in user id
    pub user_id: String,
    /// Sent as `X-Tableau-Auth`
    pub token: String,
}

impl Session {
    pub fn new(site_id: &str, user_id: &str, token: &str) -> Self {
        Session {
            site_id: site_id.to_owned(),
            user_id: user_id.to_owned(),
            token: token.to_owned(),
        }
    }
}

impl Debug for Session {
    /// Never leak the token in logs
    ///
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("site_id", &self.site_id)
            .field("user_id", &self.user_id)
            .field("token", &"HIDDEN")
            .finish()
    }
}

/// Payload of `POST /auth/signin`
///
#[derive(Debug, Deserialize)]
pub(crate) struct SignInReply {
    credentials: CredentialsReply,
}

#[derive(Debug, Deserialize)]
struct CredentialsReply {
    site: IdOnly,
    user: IdOnly,
    token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdOnly {
    pub(crate) id: String,
}

impl From<SignInReply> for Session {
    fn from(r: SignInReply) -> Self {
        Session {
            site_id: r.credentials.site.id,
            user_id: r.credentials.user.id,
            token: r.credentials.token,
        }
    }
}
