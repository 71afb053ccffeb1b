use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Default REST API version
const DEF_API_VERSION: &str = "3.7";

/// Describe the server we talk to and how to authenticate, this is the `server` block of the
/// configuration file.
///
#[derive(Clone, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Server {
    /// Host name, or a full `http(s)://host[:port]` URL
    pub name: String,
    /// REST API version
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Site `contentUrl`, empty for the default site
    #[serde(default)]
    pub site: String,
    /// Username
    pub login: String,
    /// Password
    pub password: String,
    /// Verify the server certificate?
    #[serde(default)]
    pub verify_tls: bool,
    /// Per-request timeout in seconds, none by default as packages and PDFs can be slow
    #[serde(default)]
    pub timeout: Option<u64>,
}

fn default_api_version() -> String {
    DEF_API_VERSION.to_string()
}

impl Server {
    /// Base URL of every call, `https://<name>/api/<version>`
    ///
    pub fn base_url(&self) -> String {
        let name = self.name.trim_end_matches('/');
        if name.starts_with("http://") || name.starts_with("https://") {
            format!("{}/api/{}", name, self.api_version)
        } else {
            format!("https://{}/api/{}", name, self.api_version)
        }
    }

    /// Body of the sign-in request
    ///
    pub fn credentials(&self) -> SignIn {
        SignIn {
            credentials: Credentials {
                name: self.login.clone(),
                password: self.password.clone(),
                site: SiteRef {
                    content_url: self.site.clone(),
                },
            },
        }
    }
}

impl Debug for Server {
    /// Obfuscate the password
    ///
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("name", &self.name)
            .field("api_version", &self.api_version)
            .field("site", &self.site)
            .field("login", &self.login)
            .field("password", &"HIDDEN")
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Display for Server {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Sign-in request as expected by `POST /auth/signin`
///
#[derive(Clone, Debug, Serialize)]
pub struct SignIn {
    pub credentials: Credentials,
}

/// Credentials to submit to the server to get a session
///
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// Username
    pub name: String,
    /// Password
    pub password: String,
    /// Site to sign in to
    pub site: SiteRef,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("password", &"HIDDEN")
            .field("site", &self.site)
            .finish()
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRef {
    pub content_url: String,
}
