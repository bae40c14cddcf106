use std::io::{Read as _, Write};

use reqwest::blocking::{Client, Request};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Result};
use crate::response::Response;

/// What to do with the body of a successful response.
pub enum Target<'a, T> {
    /// Decode the body as JSON into the given value.
    Json(&'a mut T),
    /// Copy the raw body bytes into the sink without decoding.
    Raw(&'a mut dyn Write),
    /// Drop the body.
    Discard,
}

/// Error body sent by the API along with a non-success status
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    documentation_url: Option<String>,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

/// Send `request` and hand its body to `target`.
///
/// The returned [`Response`] carries pagination and rate-limit data. A
/// non-success status becomes [`crate::Error::Api`], which still holds the
/// wrapped response. The body is closed on every path.
pub fn execute<T: DeserializeOwned>(
    client: &Client,
    request: Request,
    target: Target<'_, T>,
) -> Result<Response> {
    tracing::debug!(method = %request.method(), url = %request.url(), "Sending request");

    let mut resp = client.execute(request)?;
    let response = Response::from_http(&resp);

    tracing::debug!(
        status = %response.status(),
        remaining = response.rate.remaining,
        limit = response.rate.limit,
        "Received response"
    );

    if !response.status().is_success() {
        return Err(api_error(response, resp).into());
    }

    match target {
        Target::Json(value) => *value = serde_json::from_reader(resp)?,
        Target::Raw(sink) => {
            resp.copy_to(sink)?;
        }
        Target::Discard => {}
    }

    Ok(response)
}

fn api_error(response: Response, mut resp: reqwest::blocking::Response) -> ApiError {
    let mut text = String::new();
    let body = match resp.read_to_string(&mut text) {
        Ok(_) => serde_json::from_str::<ErrorBody>(&text).unwrap_or_else(|_| ErrorBody {
            message: text.trim().to_owned(),
            ..Default::default()
        }),
        Err(err) => ErrorBody {
            message: format!("unreadable error body: {err}"),
            ..Default::default()
        },
    };

    ApiError {
        response,
        message: body.message,
        documentation_url: body.documentation_url,
        errors: body.errors,
    }
}
