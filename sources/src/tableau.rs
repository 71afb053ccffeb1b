//! Tableau Server specifics
//!
//! Phases:
//! 1. sign in with the configured login & password to get a session (site id + token),
//! 2. use the token (`X-Tableau-Auth`) to look up workbooks/views by name,
//! 3. use it again to fetch the workbook package or a view rendering into a file,
//! 4. sign out.
//!
//! All endpoints are under `https://<server>/api/<version>`.
//!
//! This implement the `ContentSource` trait described in `lib`.
//!

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use clap::{crate_name, crate_version};
use eyre::Result;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_DISPOSITION;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, trace, warn};

use crate::session::{IdOnly, SignInReply};
use crate::{
    filename_from_disposition, http_get_auth, http_post, http_post_auth, stamp, unique_path,
    AuthError, ContentSource, FetchError, Server, Session, SignIn, ViewContent,
};

/// Characters escaped in filter values, `/` is kept as view content URLs use it.
const FILTER: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b',')
    .add(b'<')
    .add(b'>')
    .add(b'?');

/// `GET /sites/{site}/workbooks?filter=...`
///
#[derive(Debug, Deserialize)]
struct WorkbooksReply {
    #[serde(default)]
    workbooks: WorkbookList,
}

#[derive(Debug, Default, Deserialize)]
struct WorkbookList {
    #[serde(default)]
    workbook: Vec<IdOnly>,
}

/// `GET /sites/{site}/views?filter=...`
///
#[derive(Debug, Deserialize)]
struct ViewsReply {
    #[serde(default)]
    views: ViewList,
}

#[derive(Debug, Default, Deserialize)]
struct ViewList {
    #[serde(default)]
    view: Vec<IdOnly>,
}

/// Tableau represent what is needed to connect & auth to and fetch content from a server.
///
#[derive(Clone, Debug)]
pub struct Tableau {
    /// Server name, for logs
    pub name: String,
    /// Base URL, `https://<server>/api/<version>`
    pub base_url: String,
    /// Sign-in body
    pub credentials: SignIn,
    /// reqwest blocking client
    pub client: Client,
}

impl Tableau {
    /// Create a client from the `server` part of the configuration.
    ///
    #[tracing::instrument(skip_all)]
    pub fn new(server: &Server) -> Result<Self> {
        trace!("tableau::new({})", server);

        if !server.verify_tls {
            warn!("TLS certificate verification is disabled for {}", server.name);
        }
        let client = Client::builder()
            .danger_accept_invalid_certs(!server.verify_tls)
            .timeout(server.timeout.map(Duration::from_secs))
            .build()?;

        Ok(Tableau {
            name: server.name.clone(),
            base_url: server.base_url(),
            credentials: server.credentials(),
            client,
        })
    }

    /// Send an authenticated GET, any non-2xx answer becomes an error carrying the body.
    ///
    fn get(&self, session: &Session, url: String) -> Result<Response, FetchError> {
        trace!("GET {}", url);

        let resp = http_get_auth!(self, &url, session)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            error!("GET {} failed ({}): {}", url, status, body);
            return Err(FetchError::Status { status, body });
        }
        Ok(resp)
    }

    /// Authenticated GET returning JSON
    ///
    fn get_json<T>(&self, session: &Session, url: String) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let body = self.get(session, url)?.text()?;
        debug!("response {}", body);
        Ok(serde_json::from_str(&body)?)
    }

    fn site_url(&self, session: &Session) -> String {
        format!("{}/sites/{}", self.base_url, session.site_id)
    }
}

/// Stream the body of `resp` into `path`
///
fn save(mut resp: Response, path: PathBuf) -> Result<PathBuf, FetchError> {
    let mut file = fs::File::create(&path).map_err(|e| FetchError::Write(path.clone(), e))?;
    let size = resp.copy_to(&mut file)?;
    debug!("{} bytes written to {:?}", size, path);
    Ok(path)
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, FILTER).to_string()
}

impl ContentSource for Tableau {
    fn name(&self) -> String {
        self.name.to_string()
    }

    /// Sign in using the supplied credentials, the answer gives us the ids and token.
    ///
    #[tracing::instrument(skip(self))]
    fn sign_in(&self) -> Result<Session, AuthError> {
        trace!("sign in as ({:?})", &self.credentials.credentials.name);

        let url = format!("{}/auth/signin", self.base_url);
        let resp = http_post!(self, &url, &self.credentials)?;

        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            error!("{} is failed to sign-in. {}", self.name, status);
            error!("Response body - {}", body);
            return Err(AuthError::Refused { status, body });
        }

        let reply: SignInReply = serde_json::from_str(&body)?;
        let session = Session::from(reply);
        info!(
            "Server - {} is signed in successfully with the user {}.",
            self.name, self.credentials.credentials.name
        );
        Ok(session)
    }

    /// Sign out, the token is not usable afterwards.
    ///
    #[tracing::instrument(skip(self))]
    fn sign_out(&self, session: Session) -> Result<(), AuthError> {
        let url = format!("{}/auth/signout", self.base_url);
        let resp = http_post_auth!(self, &url, session)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(AuthError::SignOut { status, body });
        }
        info!("Server - {} is successfully signed out", self.name);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    fn resolve_workbook_id(
        &self,
        session: &Session,
        name: &str,
    ) -> Result<Option<String>, FetchError> {
        let url = format!(
            "{}/workbooks?filter=name:eq:{}",
            self.site_url(session),
            encode(name)
        );
        let reply: WorkbooksReply = self.get_json(session, url)?;
        let id = reply.workbooks.workbook.into_iter().next().map(|w| w.id);

        info!("Workbook id for {} - {:?}", name, id);
        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    fn resolve_view_id(
        &self,
        session: &Session,
        content_url: &str,
    ) -> Result<Option<String>, FetchError> {
        let url = format!(
            "{}/views?filter=contentUrl:eq:{}",
            self.site_url(session),
            encode(content_url)
        );
        let reply: ViewsReply = self.get_json(session, url)?;
        let id = reply.views.view.into_iter().next().map(|v| v.id);

        info!("View id for url {} - {:?}", content_url, id);
        Ok(id)
    }

    /// The package name comes from the server.
    ///
    #[tracing::instrument(skip(self))]
    fn download_workbook(
        &self,
        session: &Session,
        id: &str,
        dir: &Path,
    ) -> Result<PathBuf, FetchError> {
        let url = format!("{}/workbooks/{}/content", self.site_url(session), id);
        let resp = self.get(session, url)?;

        let fname = resp
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|h| h.to_str().ok())
            .and_then(filename_from_disposition)
            .ok_or(FetchError::NoFilename)?;

        let path = save(resp, dir.join(fname))?;
        info!("Downloaded workbook - {:?}", path);
        Ok(path)
    }

    /// Always ask for fresh content (`maxAge=1`).
    ///
    #[tracing::instrument(skip(self))]
    fn download_view(
        &self,
        session: &Session,
        id: &str,
        kind: ViewContent,
        dir: &Path,
        stem: &str,
    ) -> Result<PathBuf, FetchError> {
        let url = format!(
            "{}/views/{}/{}?maxAge=1",
            self.site_url(session),
            id,
            kind.endpoint()
        );
        let resp = self.get(session, url)?;

        let stem = format!("{}_{}", stem, stamp(&Local::now()));
        let path = save(resp, unique_path(dir, &stem, kind.extension()))?;
        info!("Downloaded view {} - {:?}", kind, path);
        Ok(path)
    }
}
