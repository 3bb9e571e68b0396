use crate::record::Records;
use chrono::{DateTime, Utc};
use url::Url;

/// Characters that cannot appear in a bare domain
const FORBIDDEN_DOMAIN_CHARS: &[char] = &['/', '?', '#', '@', '\\', ':'];

/// A request for one domain's ads.txt file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The advertised domain, used for correlation and error messages
    pub domain: String,

    /// The ads.txt endpoint to fetch
    pub url: Url,
}

impl Request {
    /// Creates a request for an explicit endpoint
    pub fn new(domain: impl Into<String>, url: Url) -> Self {
        Self {
            domain: domain.into(),
            url,
        }
    }

    /// Creates a request for `http://<domain>/ads.txt`
    ///
    /// The domain is trimmed and lowercased. Anything that is not a bare host
    /// name (paths, ports, credentials) is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use adstxt::Request;
    ///
    /// let request = Request::for_domain("Example.COM").unwrap();
    /// assert_eq!(request.domain, "example.com");
    /// assert_eq!(request.url.as_str(), "http://example.com/ads.txt");
    ///
    /// assert!(Request::for_domain("example.com/path").is_err());
    /// ```
    pub fn for_domain(domain: &str) -> crate::Result<Self> {
        let domain = domain.trim().trim_end_matches('.').to_ascii_lowercase();

        if domain.is_empty() {
            return Err(url::ParseError::EmptyHost.into());
        }
        if domain.contains(FORBIDDEN_DOMAIN_CHARS) || domain.contains(char::is_whitespace) {
            return Err(url::ParseError::InvalidDomainCharacter.into());
        }

        let url = Url::parse(&format!("http://{}/ads.txt", domain))?;
        Ok(Self { domain, url })
    }
}

/// A successfully fetched and parsed ads.txt file
#[derive(Debug, Clone)]
pub struct Response {
    /// The request this response answers
    pub request: Request,

    /// The URL the file was finally read from, after redirects
    pub final_url: Url,

    /// Parsed records, in file order
    pub records: Records,

    /// When this result stops being fresh
    pub expires: DateTime<Utc>,
}

impl Response {
    /// Returns true if the result is no longer fresh at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires
    }

    /// Returns true if the result is no longer fresh
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns true if at least one redirect was followed
    pub fn was_redirected(&self) -> bool {
        self.final_url != self.request.url
    }
}
