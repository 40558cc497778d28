use reqwest::redirect::Policy;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::models::trip::{Coordinates, Location};

const FLICKR_ENDPOINT: &str = "https://www.flickr.com/services/rest/";
const PHOTOS_PER_QUERY: usize = 3;
// Outbound fetches get an explicit timeout and a redirect cap so a slow or
// looping third party cannot hold a request open indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_REDIRECTS: usize = 5;

#[derive(Debug)]
pub enum PhotoError {
    EnvironmentError(String),
    HttpError(reqwest::Error),
    ResponseError(String),
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            PhotoError::HttpError(err) => write!(f, "HTTP error: {}", err),
            PhotoError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for PhotoError {}

impl From<reqwest::Error> for PhotoError {
    fn from(err: reqwest::Error) -> Self {
        PhotoError::HttpError(err)
    }
}

#[derive(Debug, Deserialize)]
struct FlickrResponse {
    photos: Option<FlickrPhotoPage>,
}

#[derive(Debug, Deserialize)]
struct FlickrPhotoPage {
    #[serde(default)]
    photo: Vec<FlickrPhoto>,
}

#[derive(Debug, Deserialize)]
struct FlickrPhoto {
    id: String,
    server: String,
    secret: String,
}

/// Photo URLs found for one point of interest. An empty list is a valid
/// result, not an error.
#[derive(Debug, Serialize, Clone)]
pub struct LocationPhotos {
    pub title: String,
    pub urls: Vec<String>,
}

/// Seam between the batch lookup and the photo backend. Tests substitute a
/// canned lookup.
pub trait PhotoLookup {
    async fn search(
        &self,
        query: &str,
        near: Option<Coordinates>,
    ) -> Result<Vec<String>, PhotoError>;
}

#[derive(Clone)]
pub struct PhotoService {
    client: Client,
    api_key: String,
}

impl PhotoService {
    pub fn new(api_key: impl Into<String>) -> Result<Self, PhotoError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }

    pub fn from_env() -> Result<Self, PhotoError> {
        let api_key = std::env::var("FLICKR_API_KEY")
            .map_err(|_| PhotoError::EnvironmentError("FLICKR_API_KEY not set".to_string()))?;
        Self::new(api_key)
    }

    /// Best-effort photo search for a text query, optionally biased toward
    /// coordinates.
    pub async fn search(
        &self,
        query: &str,
        near: Option<Coordinates>,
    ) -> Result<Vec<String>, PhotoError> {
        let per_page = PHOTOS_PER_QUERY.to_string();
        let mut params = vec![
            ("method", "flickr.photos.search".to_string()),
            ("api_key", self.api_key.clone()),
            ("text", query.to_string()),
            ("sort", "relevance".to_string()),
            ("per_page", per_page),
            ("format", "json".to_string()),
            ("nojsoncallback", "1".to_string()),
        ];
        if let Some(coords) = near {
            params.push(("lat", coords.lat.to_string()));
            params.push(("lon", coords.lng.to_string()));
        }

        let response = self
            .client
            .get(FLICKR_ENDPOINT)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PhotoError::ResponseError(format!(
                "Photo search failed with status {}",
                status
            )));
        }

        let body: FlickrResponse = response
            .json()
            .await
            .map_err(|e| PhotoError::ResponseError(format!("Failed to parse response: {}", e)))?;

        let urls = body
            .photos
            .map(|page| {
                page.photo
                    .into_iter()
                    .map(|p| {
                        format!(
                            "https://live.staticflickr.com/{}/{}_{}_b.jpg",
                            p.server, p.id, p.secret
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(urls)
    }
}

impl PhotoLookup for PhotoService {
    async fn search(
        &self,
        query: &str,
        near: Option<Coordinates>,
    ) -> Result<Vec<String>, PhotoError> {
        PhotoService::search(self, query, near).await
    }
}

/// Photo lookup for a batch of points of interest. Requests are issued
/// sequentially, one outstanding at a time, to avoid rate-limit bursts.
/// A failed lookup yields an empty list for that entry rather than
/// failing the batch.
pub async fn photos_for_locations(
    lookup: &impl PhotoLookup,
    locations: &[Location],
) -> Vec<LocationPhotos> {
    let mut results = Vec::with_capacity(locations.len());
    for location in locations {
        let urls = match lookup.search(&location.title, location.coordinates).await {
            Ok(urls) => urls,
            Err(e) => {
                log::warn!("Photo lookup failed for '{}': {}", location.title, e);
                Vec::new()
            }
        };
        results.push(LocationPhotos {
            title: location.title.clone(),
            urls,
        });
    }
    results
}
