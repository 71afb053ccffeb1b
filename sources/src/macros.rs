//! Define our own macro to simplify the code
//!
//! Every call sends JSON and asks for JSON, error bodies included.
//!

/// Call the HTTP client with the proper arguments
///
/// - unauth call to get a session by submitting credentials
///
#[macro_export]
macro_rules! http_post {
    ($self:ident, $url:expr, $cred:expr) => {
        $self
            .client
            .post($url)
            .header(
                "user-agent",
                format!("{}/{}", crate_name!(), crate_version!()),
            )
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .json($cred)
            .send()
    };
}

/// Call the HTTP client with the proper arguments
///
/// - auth call without a body (sign-out)
///
#[macro_export]
macro_rules! http_post_auth {
    ($self:ident, $url:expr, $session:expr) => {
        $self
            .client
            .post($url)
            .header(
                "user-agent",
                format!("{}/{}", crate_name!(), crate_version!()),
            )
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .header("x-tableau-auth", &$session.token)
            .send()
    };
}

/// Call the HTTP client with the proper arguments
///
/// - auth call for lookups and content
///
#[macro_export]
macro_rules! http_get_auth {
    ($self:ident, $url:expr, $session:expr) => {
        $self
            .client
            .get($url)
            .header(
                "user-agent",
                format!("{}/{}", crate_name!(), crate_version!()),
            )
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .header("x-tableau-auth", &$session.token)
            .send()
    };
}
