//! Query parameters of the movie listing endpoint.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};
use serde_json::json;

use crate::domain::repositories::SortField;
use crate::error::AppError;

/// Page size used when `limit` is not given.
pub const DEFAULT_LIMIT: i64 = 10;

/// `GET /movies?page=&limit=&down=&sort=`
///
/// Uses `serde_with` to parse numbers and booleans from query strings.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct ListMoviesParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,

    /// Sort descending. Defaults to `true`.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub down: Option<bool>,

    #[serde(default)]
    pub sort: Option<SortField>,
}

/// Resolved listing request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListQuery {
    pub page: i64,
    pub limit: i64,
    pub descending: bool,
    pub sort: SortField,
}

impl ListMoviesParams {
    /// Applies defaults. Range checks on `page` and `limit` are left to the
    /// service.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page` is missing.
    pub fn resolve(self) -> Result<ListQuery, AppError> {
        let page = self.page.ok_or_else(|| {
            AppError::bad_request(
                "page - must be provided;",
                json!({ "page": ["must be provided"] }),
            )
        })?;

        Ok(ListQuery {
            page,
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
            descending: self.down.unwrap_or(true),
            sort: self.sort.unwrap_or_default(),
        })
    }
}
