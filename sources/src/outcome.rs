//! `Outcome<T>` tells apart "not asked for", "nothing found" and "failed" for every step of a
//! row, instead of mixing empty values and error markers.
//!

use std::ffi::OsStr;
use std::fmt::Display;

/// Marker written in the report for a failed step
pub const ERROR_MARK: &str = "ERROR";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome<T> {
    /// We got it
    Done(T),
    /// The row did not ask for it
    NotRequested,
    /// Lookup found nothing, or depends on something not found
    NotFound,
    /// Something went wrong, with the reason
    Failed(String),
}

impl<T> Default for Outcome<T> {
    fn default() -> Self {
        Outcome::NotRequested
    }
}

impl<T> Outcome<T> {
    /// Turn a lookup result into an outcome, `Ok(None)` is `NotFound`.
    ///
    pub fn from_lookup<E: Display>(r: Result<Option<T>, E>) -> Self {
        match r {
            Ok(Some(v)) => Outcome::Done(v),
            Ok(None) => Outcome::NotFound,
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }

    /// Turn a fetch result into an outcome
    ///
    pub fn from_fetch<E: Display>(r: Result<T, E>) -> Self {
        match r {
            Ok(v) => Outcome::Done(v),
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }

    /// Chain a step depending on this one: only `Done` runs `f`, everything else carries over.
    ///
    pub fn and_then<U, F>(&self, f: F) -> Outcome<U>
    where
        F: FnOnce(&T) -> Outcome<U>,
    {
        match self {
            Outcome::Done(v) => f(v),
            Outcome::NotRequested => Outcome::NotRequested,
            Outcome::NotFound => Outcome::NotFound,
            Outcome::Failed(e) => Outcome::Failed(e.clone()),
        }
    }

    pub fn done(&self) -> Option<&T> {
        match self {
            Outcome::Done(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Short label, used in summaries
    ///
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Done(_) => "done",
            Outcome::NotRequested => "not requested",
            Outcome::NotFound => "not found",
            Outcome::Failed(_) => "failed",
        }
    }
}

impl<T: AsRef<OsStr>> Outcome<T> {
    /// Value of the report column: the value itself, nothing or `ERROR`.
    ///
    pub fn to_field(&self) -> String {
        match self {
            Outcome::Done(v) => v.as_ref().to_string_lossy().to_string(),
            Outcome::NotRequested | Outcome::NotFound => String::new(),
            Outcome::Failed(_) => ERROR_MARK.to_string(),
        }
    }
}
