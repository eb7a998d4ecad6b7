//! USGS FDSN event catalog client.
//!
//! Provides blocking HTTP access to the catalog query endpoint.
//! Uses reqwest with rustls for TLS. One request per fetch, no retries:
//! a failed fetch surfaces immediately and the caller decides whether to
//! degrade to an empty table.

use std::fmt::Write as _;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, instrument, warn};

use crate::catalog::EventTable;
use crate::errors::QuakemapError;

/// Default request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent string for API requests.
const USER_AGENT: &str = concat!("quakemap/", env!("CARGO_PKG_VERSION"));

/// USGS base URL for the FDSN event service.
const USGS_BASE_URL: &str = "https://earthquake.usgs.gov";

/// Bounding box applied at fetch time.
///
/// Geographic narrowing is a catalog-query concern; the year/magnitude
/// filters applied after the table is built never re-check coordinates.
#[derive(Debug, Clone, Copy)]
pub struct BBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl std::str::FromStr for BBox {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(format!(
                "bbox requires 4 values (minlat,minlon,maxlat,maxlon), got {}",
                parts.len()
            ));
        }

        let vals: Result<Vec<f64>, _> = parts.iter().map(|p| p.trim().parse::<f64>()).collect();
        let vals = vals.map_err(|e| format!("invalid number in bbox: {e}"))?;

        let bbox = Self {
            min_lat: vals[0],
            min_lon: vals[1],
            max_lat: vals[2],
            max_lon: vals[3],
        };

        // Validate ranges
        if bbox.min_lat < -90.0 || bbox.min_lat > 90.0 {
            return Err(format!("min_lat {} out of range [-90, 90]", bbox.min_lat));
        }
        if bbox.max_lat < -90.0 || bbox.max_lat > 90.0 {
            return Err(format!("max_lat {} out of range [-90, 90]", bbox.max_lat));
        }
        if bbox.min_lon < -180.0 || bbox.min_lon > 180.0 {
            return Err(format!("min_lon {} out of range [-180, 180]", bbox.min_lon));
        }
        if bbox.max_lon < -180.0 || bbox.max_lon > 180.0 {
            return Err(format!("max_lon {} out of range [-180, 180]", bbox.max_lon));
        }
        if bbox.min_lat > bbox.max_lat {
            return Err(format!(
                "min_lat {} must be <= max_lat {}",
                bbox.min_lat, bbox.max_lat
            ));
        }

        Ok(bbox)
    }
}

/// Parameters for a single catalog fetch.
#[derive(Debug, Clone)]
pub struct FeedQuery {
    /// Window start (inclusive, UTC calendar date).
    pub start_date: chrono::NaiveDate,
    /// Window end (inclusive, UTC calendar date).
    pub end_date: chrono::NaiveDate,
    /// Minimum magnitude requested from the catalog.
    pub min_magnitude: f64,
    /// Optional geographic narrowing.
    pub bbox: Option<BBox>,
}

impl FeedQuery {
    /// Build the full query URL against a base URL.
    #[must_use]
    pub fn to_url(&self, base_url: &str) -> String {
        let mut url = format!(
            "{base_url}/fdsnws/event/1/query?format=csv&starttime={}&endtime={}&minmagnitude={}",
            self.start_date, self.end_date, self.min_magnitude
        );

        if let Some(bbox) = self.bbox {
            // write! to a String cannot fail
            let _ = write!(
                url,
                "&minlatitude={}&maxlatitude={}&minlongitude={}&maxlongitude={}",
                bbox.min_lat, bbox.max_lat, bbox.min_lon, bbox.max_lon
            );
        }

        url
    }
}

/// Transport abstraction over the single GET a fetch performs.
///
/// Lets tests substitute fixture responses for the network.
pub trait FeedTransport {
    /// Issue one GET and return the response body on a 2xx status.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-2xx status, or a
    /// body that cannot be read.
    fn get(&self, url: &str) -> Result<String, QuakemapError>;
}

/// reqwest-backed transport with a bounded timeout.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, QuakemapError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

impl FeedTransport for HttpTransport {
    fn get(&self, url: &str) -> Result<String, QuakemapError> {
        let response = self.client.get(url).send()?;

        // Check status before reading the body
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(QuakemapError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text()?)
    }
}

/// Client for the event catalog endpoint.
pub struct CatalogClient<T = HttpTransport> {
    transport: T,
    base_url: String,
}

impl CatalogClient<HttpTransport> {
    /// Create a new catalog client against the USGS endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, QuakemapError> {
        Ok(Self {
            transport: HttpTransport::new()?,
            base_url: USGS_BASE_URL.to_string(),
        })
    }
}

impl<T: FeedTransport> CatalogClient<T> {
    /// Create a client with an injected transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            base_url: USGS_BASE_URL.to_string(),
        }
    }

    /// Fetch the raw CSV body for a query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not 2xx.
    #[instrument(skip(self), fields(start = %query.start_date, end = %query.end_date))]
    pub fn fetch_raw(&self, query: &FeedQuery) -> Result<String, QuakemapError> {
        let url = query.to_url(&self.base_url);

        debug!("fetching catalog from {}", url);

        let body = self.transport.get(&url)?;

        debug!("fetched {} bytes", body.len());
        Ok(body)
    }

    /// Fetch and build the event table for a query.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails or the body is malformed
    /// beyond per-row recovery (e.g. a required column is missing).
    pub fn fetch_table(&self, query: &FeedQuery) -> Result<EventTable, QuakemapError> {
        let body = self.fetch_raw(query)?;
        EventTable::from_csv(&body)
    }

    /// Fetch the event table, degrading to an empty table on any failure.
    ///
    /// The error is logged; callers keep rendering with "no data" rather
    /// than crash.
    pub fn fetch_table_or_empty(&self, query: &FeedQuery) -> EventTable {
        match self.fetch_table(query) {
            Ok(table) => table,
            Err(e) => {
                warn!("catalog fetch failed, continuing with empty table: {e}");
                EventTable::empty()
            }
        }
    }
}
