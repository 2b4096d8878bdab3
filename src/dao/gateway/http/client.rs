use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use time::Date;

use crate::{
    dao::gateway::{
        BookingsGateway, TeamsGateway, TournamentGateway,
        error::{GatewayError, GatewayResult},
        models::{
            BookingDocument, BookingsEnvelope, ScheduleRequestDocument, TeamDocument,
            TeamsEnvelope, TournamentDocument,
        },
    },
    state::{schedule::format_calendar_date, user::AccessToken},
};

use super::config::GatewayConfig;

/// reqwest-backed client for the teams, tournaments and bookings endpoints.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Arc<Url>,
    service_token: Option<Arc<str>>,
}

impl HttpGateway {
    /// Build the HTTP client. No request is sent until a gateway method is called.
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| GatewayError::InvalidBaseUrl {
                url: config.base_url.clone(),
            })?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| GatewayError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::new(base_url),
            service_token: config.service_token.map(Arc::<str>::from),
        })
    }

    /// Endpoint under the base URL. Each segment is percent-encoded, so a value can never
    /// escape its own segment.
    fn url(&self, segments: &[&str]) -> GatewayResult<Url> {
        if let Some(segment) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(GatewayError::InvalidPathSegment {
                segment: segment.to_string(),
            });
        }

        let mut url = (*self.base_url).clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::InvalidBaseUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request, authenticating with the caller's token or the service token.
    fn request(&self, method: Method, url: Url, token: Option<&AccessToken>) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match token.map(AccessToken::expose).or(self.service_token.as_deref()) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json<T>(&self, path: &str, builder: RequestBuilder) -> GatewayResult<T>
    where
        T: DeserializeOwned,
    {
        let response = builder
            .send()
            .await
            .map_err(|source| GatewayError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(GatewayError::RequestStatus {
                path: path.to_string(),
                status: response.status(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| GatewayError::DecodeResponse {
                path: path.to_string(),
                source,
            })
    }
}

impl TeamsGateway for HttpGateway {
    fn list_teams(
        &self,
        token: Option<AccessToken>,
        limit: u32,
    ) -> BoxFuture<'static, GatewayResult<Vec<TeamDocument>>> {
        let gateway = self.clone();
        Box::pin(async move {
            const PATH: &str = "api/teams";
            let url = gateway.url(&["api", "teams"])?;
            let builder = gateway
                .request(Method::GET, url, token.as_ref())
                .query(&[("limit", limit)]);
            let envelope = gateway.send_json::<TeamsEnvelope>(PATH, builder).await?;
            Ok(envelope.teams)
        })
    }
}

impl TournamentGateway for HttpGateway {
    fn schedule_tournament(
        &self,
        token: Option<AccessToken>,
        tournament_id: String,
        request: ScheduleRequestDocument,
    ) -> BoxFuture<'static, GatewayResult<TournamentDocument>> {
        let gateway = self.clone();
        Box::pin(async move {
            let url = gateway.url(&["api", "tournaments", &tournament_id, "schedule"])?;
            let path = url.path().to_string();
            let builder = gateway
                .request(Method::POST, url, token.as_ref())
                .json(&request);
            gateway.send_json(&path, builder).await
        })
    }
}

impl BookingsGateway for HttpGateway {
    fn list_bookings(
        &self,
        token: Option<AccessToken>,
        court_id: String,
        date: Date,
    ) -> BoxFuture<'static, GatewayResult<Vec<BookingDocument>>> {
        let gateway = self.clone();
        Box::pin(async move {
            const PATH: &str = "api/bookings";
            let date = format_calendar_date(date);
            let url = gateway.url(&["api", "bookings"])?;
            let builder = gateway
                .request(Method::GET, url, token.as_ref())
                .query(&[("courtId", court_id.as_str()), ("date", date.as_str())]);
            let envelope = gateway.send_json::<BookingsEnvelope>(PATH, builder).await?;
            Ok(envelope.bookings)
        })
    }
}
