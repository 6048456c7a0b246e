//! Page-number pagination primitives shared by list endpoints.
//!
//! List endpoints accept `page`, `size`, and `sort` query parameters and
//! answer with a slice of records plus `X-Total-Count` and `Link` headers.
//! This crate owns the parsing of those parameters and the rendering of the
//! navigation links so adapters only translate between HTTP and domain
//! types.
//!
//! Pages are zero-based. `size` defaults to [`DEFAULT_PAGE_SIZE`] and is
//! capped at [`MAX_PAGE_SIZE`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

mod links;

pub use links::link_header;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors raised while parsing pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// `size` was zero or above [`MAX_PAGE_SIZE`].
    #[error("page size must be between 1 and {max}, got {size}")]
    InvalidSize {
        /// The rejected size.
        size: u32,
        /// The configured maximum.
        max: u32,
    },
    /// `sort` was not of the form `field` or `field,asc|desc`.
    #[error("sort must be `field` or `field,asc|desc`, got `{value}`")]
    InvalidSort {
        /// The rejected raw value.
        value: String,
    },
    /// `sort` named a field that the endpoint does not allow.
    #[error("cannot sort by `{field}`")]
    UnknownSortField {
        /// The rejected field name.
        field: String,
    },
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Smallest value first.
    Asc,
    /// Largest value first.
    Desc,
}

impl Direction {
    /// Wire representation used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = PaginationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(PaginationError::InvalidSort {
                value: s.to_owned(),
            }),
        }
    }
}

/// Ordering applied to a list query.
///
/// # Examples
/// ```
/// use pagination::{Direction, Sort};
///
/// let sort: Sort = "timestamp,desc".parse().expect("valid sort");
/// assert_eq!(sort.field(), "timestamp");
/// assert_eq!(sort.direction(), Direction::Desc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sort {
    field: String,
    direction: Direction,
}

impl Sort {
    /// Construct an ordering on `field`.
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Ascending ordering on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Asc)
    }

    /// Descending ordering on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Desc)
    }

    /// Field name as supplied by the caller.
    #[must_use]
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Requested direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Reject the ordering unless its field appears in `allowed`.
    ///
    /// # Errors
    /// Returns [`PaginationError::UnknownSortField`] for fields outside the
    /// allow-list.
    pub fn ensure_allowed(&self, allowed: &[&str]) -> Result<(), PaginationError> {
        if allowed.contains(&self.field()) {
            Ok(())
        } else {
            Err(PaginationError::UnknownSortField {
                field: self.field.clone(),
            })
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.field, self.direction)
    }
}

impl FromStr for Sort {
    type Err = PaginationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PaginationError::InvalidSort {
            value: s.to_owned(),
        };
        let mut parts = s.split(',');
        let field = parts.next().map(str::trim).unwrap_or_default();
        if field.is_empty() {
            return Err(invalid());
        }
        let direction = match parts.next() {
            Some(raw) => raw.parse().map_err(|_| invalid())?,
            None => Direction::Asc,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::new(field, direction))
    }
}

/// Raw query parameters as received by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageParams {
    /// Zero-based page index.
    pub page: Option<u32>,
    /// Number of items per page.
    pub size: Option<u32>,
    /// `field` or `field,asc|desc`.
    pub sort: Option<String>,
}

/// Validated page request.
///
/// # Examples
/// ```
/// use pagination::{PageParams, PageRequest};
///
/// let request = PageRequest::try_from(PageParams {
///     page: Some(2),
///     size: Some(10),
///     sort: None,
/// })
/// .expect("valid request");
/// assert_eq!(request.offset(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort: Option<Sort>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

impl PageRequest {
    /// Construct a request for `page` of `size` items.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidSize`] when `size` is zero or above
    /// [`MAX_PAGE_SIZE`].
    pub fn new(page: u32, size: u32) -> Result<Self, PaginationError> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(PaginationError::InvalidSize {
                size,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(Self {
            page,
            size,
            sort: None,
        })
    }

    /// Attach an explicit ordering.
    #[must_use]
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Explicit ordering, if the caller supplied one.
    #[must_use]
    pub const fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// Number of items to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl TryFrom<PageParams> for PageRequest {
    type Error = PaginationError;

    fn try_from(value: PageParams) -> Result<Self, Self::Error> {
        let request = Self::new(
            value.page.unwrap_or(0),
            value.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?;
        match value.sort {
            Some(raw) if !raw.trim().is_empty() => Ok(request.with_sort(raw.parse()?)),
            _ => Ok(request),
        }
    }
}

/// One page of results together with the total element count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    request: PageRequest,
}

impl<T> Page<T> {
    /// Assemble a page from its content and the total number of matches.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Total number of elements across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// The request that produced this page.
    #[must_use]
    pub const fn request(&self) -> &PageRequest {
        &self.request
    }

    /// Number of pages needed to hold every element; zero when empty.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.request.size))
    }

    /// Transform the items while keeping the page metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }

    /// Render the RFC 5988 `Link` header for this page relative to `base`.
    #[must_use]
    pub fn link_header(&self, base: &Url) -> String {
        link_header(base, &self.request, self.total_pages())
    }
}
