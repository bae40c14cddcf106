use jiff::Timestamp;
use reqwest::header::{HeaderMap, LINK};
use reqwest::{StatusCode, Url};

const HEADER_RATE_LIMIT: &str = "X-RateLimit-Limit";
const HEADER_RATE_REMAINING: &str = "X-RateLimit-Remaining";
const HEADER_RATE_RESET: &str = "X-RateLimit-Reset";

/// Page numbers advertised by the `Link` header of a response.
///
/// Any of these may be unset for responses that are not part of a paginated
/// set, or when there is no such page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub next: Option<u32>,
    pub prev: Option<u32>,
    pub first: Option<u32>,
    pub last: Option<u32>,
}

impl Pagination {
    /// Parse the first `Link` header value.
    ///
    /// Malformed links are skipped and malformed page numbers leave the
    /// field unset: pagination is advisory, the page body is still valid.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut pagination = Self::default();
        let Some(links) = headers.get(LINK).and_then(|v| v.to_str().ok()) else {
            return pagination;
        };

        for link in links.split(',') {
            let segments: Vec<&str> = link.trim().split(';').collect();

            // href plus at least one rel
            if segments.len() < 2 {
                continue;
            }

            let Some(href) = segments[0]
                .strip_prefix('<')
                .and_then(|s| s.strip_suffix('>'))
            else {
                continue;
            };

            let Some(page) = page_param(href) else {
                continue;
            };
            let page = page.parse::<u32>().ok();

            for segment in &segments[1..] {
                match segment.trim() {
                    r#"rel="next""# => pagination.next = page,
                    r#"rel="prev""# => pagination.prev = page,
                    r#"rel="first""# => pagination.first = page,
                    r#"rel="last""# => pagination.last = page,
                    _ => {}
                }
            }
        }

        pagination
    }
}

fn page_param(href: &str) -> Option<String> {
    let (_, query) = href.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Request quota as reported by the `X-RateLimit-*` headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rate {
    pub limit: u32,
    pub remaining: u32,
    /// `None` when the reset header is missing, unparsable or zero.
    pub reset: Option<Timestamp>,
}

impl Rate {
    /// Each header is parsed on its own; a bad value leaves only that field at zero.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let limit = header_number::<u32>(headers, HEADER_RATE_LIMIT).unwrap_or(0);
        let remaining = header_number::<u32>(headers, HEADER_RATE_REMAINING).unwrap_or(0);
        let reset = header_number::<i64>(headers, HEADER_RATE_RESET)
            .filter(|&secs| secs != 0)
            .and_then(|secs| Timestamp::from_second(secs).ok());

        Self {
            limit,
            remaining,
            reset,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.limit > 0 && self.remaining == 0
    }
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// An API response with its pagination and rate-limit metadata.
///
/// Only the status line and headers are kept; the body belongs to whoever
/// executed the request.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    url: Url,
    headers: HeaderMap,
    pub pagination: Pagination,
    pub rate: Rate,
}

impl Response {
    pub fn new(status: StatusCode, url: Url, headers: HeaderMap) -> Self {
        let pagination = Pagination::from_headers(&headers);
        let rate = Rate::from_headers(&headers);
        Self {
            status,
            url,
            headers,
            pagination,
            rate,
        }
    }

    pub fn from_http(resp: &reqwest::blocking::Response) -> Self {
        Self::new(resp.status(), resp.url().clone(), resp.headers().clone())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}
