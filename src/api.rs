use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::models::{Activity, WeeklySchedule};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("invalid API base url {url}: {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Authenticated session for one user of the portal. Owns the view epoch
/// used to drop responses that arrive after the user moved on.
#[derive(Debug)]
pub struct Session {
    base_url: reqwest::Url,
    token: Option<String>,
    epoch: AtomicU64,
}

/// Ticket taken when a view starts loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewTicket(u64);

#[derive(Debug)]
pub struct Loaded<T> {
    pub ticket: ViewTicket,
    pub value: T,
}

impl Session {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ApiError> {
        // Url::join drops the last path segment unless it ends with a slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = reqwest::Url::parse(&normalized).map_err(|e| ApiError::BaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::BaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme {}", base_url.scheme()),
            });
        }

        Ok(Session {
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
            epoch: AtomicU64::new(0),
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<reqwest::Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::BaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Starts a new view; every earlier ticket becomes stale.
    pub fn begin_view(&self) -> ViewTicket {
        ViewTicket(self.epoch.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Returns the value only if no other view started since it was requested.
    pub fn accept<T>(&self, loaded: Loaded<T>) -> Option<T> {
        if loaded.ticket.0 == self.epoch.load(Ordering::SeqCst) {
            Some(loaded.value)
        } else {
            tracing::debug!(ticket = loaded.ticket.0, "discarding stale response");
            None
        }
    }
}

pub struct ApiClient {
    http: reqwest::Client,
    session: Session,
}

impl ApiClient {
    pub fn new(session: Session) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(ApiError::Client)?;
        Ok(ApiClient { http, session })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let url = self.session.endpoint(path)?;
        let mut request = self.http.get(url.clone());
        if let Some(token) = &self.session.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(%url, "fetching");
        let response = request.send().await.map_err(|source| ApiError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }

        let items: Vec<T> = response.json().await.map_err(|source| ApiError::Request {
            url: url.to_string(),
            source,
        })?;
        tracing::info!(%url, count = items.len(), "fetched");
        Ok(items)
    }

    pub async fn fetch_schedules(&self) -> Result<Vec<WeeklySchedule>, ApiError> {
        self.get_list("aulas").await
    }

    pub async fn fetch_activities(&self) -> Result<Vec<Activity>, ApiError> {
        self.get_list("atividades").await
    }

    /// Fetches schedules and activities concurrently for one view.
    pub async fn load_view(
        &self,
    ) -> Result<Loaded<(Vec<WeeklySchedule>, Vec<Activity>)>, ApiError> {
        let ticket = self.session.begin_view();
        let value = tokio::try_join!(self.fetch_schedules(), self.fetch_activities())?;
        Ok(Loaded { ticket, value })
    }
}
