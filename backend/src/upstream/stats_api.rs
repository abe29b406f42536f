//! Stats API shot chart client.
//!
//! `GET {base_url}/shotchartdetail` answers with a table-shaped payload:
//!
//! ```json
//! {"resultSets": [{"name": "Shot_Chart_Detail",
//!                  "headers": ["GRID_TYPE", "GAME_ID", ..., "LOC_X", "LOC_Y", ...],
//!                  "rowSet": [["Shot Chart Detail", "0022300061", ..., -12, 85, ...]]}]}
//! ```
//!
//! `LOC_X`/`LOC_Y` are tenths of a foot from the basket, `SHOT_MADE_FLAG` is
//! 0 or 1 and `SHOT_TYPE` is `"2PT Field Goal"` or `"3PT Field Goal"`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ShotChartRequest, ShotDataProvider, UpstreamError};
use crate::config::UpstreamSettings;
use crate::models::RawShot;

const SHOT_CHART_RESULT_SET: &str = "Shot_Chart_Detail";
const COL_LOC_X: &str = "LOC_X";
const COL_LOC_Y: &str = "LOC_Y";
const COL_MADE: &str = "SHOT_MADE_FLAG";
const COL_SHOT_TYPE: &str = "SHOT_TYPE";

/// Tenths of a foot per foot.
const LOC_UNITS_PER_FOOT: f64 = 10.0;

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(rename = "resultSets")]
    result_sets: Vec<ResultSet>,
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    #[serde(default)]
    name: String,
    headers: Vec<String>,
    #[serde(rename = "rowSet")]
    row_set: Vec<Vec<Value>>,
}

struct Columns {
    loc_x: usize,
    loc_y: usize,
    made: usize,
    shot_type: usize,
}

impl Columns {
    fn locate(headers: &[String]) -> Result<Self, UpstreamError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| UpstreamError::decode(format!("missing column {}", name)))
        };
        Ok(Self {
            loc_x: find(COL_LOC_X)?,
            loc_y: find(COL_LOC_Y)?,
            made: find(COL_MADE)?,
            shot_type: find(COL_SHOT_TYPE)?,
        })
    }
}

/// Decode a shot chart response body into raw shots.
///
/// Rows with unreadable coordinates or outcomes are kept with `NaN`
/// coordinates or an unknown outcome; the aggregator skips them. A body that
/// is not a shot chart table at all is a [`UpstreamError::Decode`].
pub fn parse_shot_chart(body: &[u8]) -> Result<Vec<RawShot>, UpstreamError> {
    let response: StatsResponse =
        serde_json::from_slice(body).map_err(|e| UpstreamError::decode(e.to_string()))?;

    let result_set = response
        .result_sets
        .iter()
        .find(|set| set.name == SHOT_CHART_RESULT_SET)
        .or_else(|| response.result_sets.first())
        .ok_or_else(|| UpstreamError::decode("response has no result sets"))?;

    let columns = Columns::locate(&result_set.headers)?;
    Ok(result_set
        .row_set
        .iter()
        .map(|row| shot_from_row(row, &columns))
        .collect())
}

fn shot_from_row(row: &[Value], columns: &Columns) -> RawShot {
    let feet = |ix: usize| {
        row.get(ix)
            .and_then(Value::as_f64)
            .map_or(f64::NAN, |tenths| tenths / LOC_UNITS_PER_FOOT)
    };
    let made = match row.get(columns.made) {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Some(Value::Bool(b)) => Some(*b),
        _ => None,
    };
    let is_three_point = row
        .get(columns.shot_type)
        .and_then(Value::as_str)
        .is_some_and(|s| s.contains("3PT"));

    RawShot {
        x_feet: feet(columns.loc_x),
        y_feet: feet(columns.loc_y),
        made,
        is_three_point,
    }
}

/// Production provider for the stats API.
#[derive(Debug, Clone)]
pub struct StatsApiProvider {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl StatsApiProvider {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, UpstreamError> {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(default_headers(&settings.user_agent)?)
            .build()
            .map_err(|e| UpstreamError::Transport(format!("failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/shotchartdetail", self.base_url)
    }

    /// Query string for one request. The endpoint rejects requests that omit
    /// any of its filters, so the unused ones are sent empty.
    pub fn query_params(request: &ShotChartRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("PlayerID", request.player_id.to_string()),
            ("Season", request.season.clone()),
            ("SeasonType", request.season_type.clone()),
            ("TeamID", "0".to_string()),
            ("ContextMeasure", "FGA".to_string()),
            ("LeagueID", "00".to_string()),
            ("LastNGames", "0".to_string()),
            ("Month", "0".to_string()),
            ("OpponentTeamID", "0".to_string()),
            ("Period", "0".to_string()),
        ];
        for empty in [
            "AheadBehind",
            "ClutchTime",
            "ContextFilter",
            "DateFrom",
            "DateTo",
            "EndPeriod",
            "EndRange",
            "GameID",
            "GameSegment",
            "Location",
            "Outcome",
            "PlayerPosition",
            "RangeType",
            "RookieYear",
            "SeasonSegment",
            "StartPeriod",
            "StartRange",
            "VsConference",
            "VsDivision",
        ] {
            params.push((empty, String::new()));
        }
        params
    }

    fn map_transport_error(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.timeout)
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

fn default_headers(user_agent: &str) -> Result<HeaderMap, UpstreamError> {
    let mut headers = HeaderMap::new();
    let agent = HeaderValue::from_str(user_agent)
        .map_err(|e| UpstreamError::Transport(format!("invalid user agent: {}", e)))?;
    headers.insert(USER_AGENT, agent);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
    headers.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));
    headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
    headers.insert("x-nba-stats-token", HeaderValue::from_static("true"));
    Ok(headers)
}

#[async_trait]
impl ShotDataProvider for StatsApiProvider {
    async fn fetch_shots(&self, request: &ShotChartRequest) -> Result<Vec<RawShot>, UpstreamError> {
        let url = self.endpoint();
        debug!(
            player_id = %request.player_id,
            season = %request.season,
            season_type = %request.season_type,
            "fetching shot chart"
        );

        let response = self
            .client
            .get(&url)
            .query(&Self::query_params(request))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), url = %url, "shot chart request rejected");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.map_transport_error(e))?;
        let shots = parse_shot_chart(&body)?;
        debug!(player_id = %request.player_id, shots = shots.len(), "shot chart decoded");
        Ok(shots)
    }

    fn provider_name(&self) -> &'static str {
        "stats-api"
    }
}

#[cfg(test)]
#[path = "stats_api_tests.rs"]
mod stats_api_tests;
