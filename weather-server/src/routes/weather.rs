use axum::{
    Extension, Json,
    extract::{Query, rejection::QueryRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use weather_core::{WeatherProxy, WeatherResult};

use crate::cors::{ALLOW_HEADERS, ALLOW_METHODS, AllowedOrigins, MAX_AGE_SECS};
use crate::types::AppError;

/// Current weather for `?city=`
///
/// Relays the upstream JSON unchanged on success. When `city` repeats, the
/// first value wins. A query string that cannot be decoded counts as a
/// missing city.
pub async fn handler(
    Extension(proxy): Extension<WeatherProxy>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<WeatherResult>, AppError> {
    let city = match &params {
        Ok(Query(pairs)) => first_city(pairs),
        Err(rejection) => {
            tracing::debug!("Unreadable query string: {rejection}");
            None
        }
    };

    let result = proxy.get_weather(city).await?;
    Ok(Json(result))
}

fn first_city(pairs: &[(String, String)]) -> Option<&str> {
    pairs.iter().find(|(key, _)| key == "city").map(|(_, value)| value.as_str())
}

/// CORS preflight for `/weather`
pub async fn preflight(
    Extension(origins): Extension<AllowedOrigins>,
    headers: HeaderMap,
) -> Response {
    let Some(origin) = origins.matching(&headers) else {
        return StatusCode::NO_CONTENT.into_response();
    };

    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, origin),
            (header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS)),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS)),
            (header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE_SECS)),
        ],
    )
        .into_response()
}
