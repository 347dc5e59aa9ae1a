//! User- and developer-facing message dictionary.

/// Display name of the connector.
pub const CONNECTOR_NAME: &str = "Spotify Connector";

/// Generic message surfaced to the user when anything unrecoverable happens.
/// The detailed error only ever goes to the developer log.
pub const DEFAULT_ERROR: &str = "An unrecoverable error occurred. Contact Support Team";

/// Shown when a data gather starts without stored tokens.
pub const MISSING_AUTH: &str = "Missing Authentication!";

/// Documented Spotify Web API status-code explanations.
///
/// See <https://developer.spotify.com/documentation/web-api/#response-status-codes>
pub fn status_code_message(status: u16) -> Option<&'static str> {
    match status {
        400 => Some(
            "Bad Request - The request could not be understood by the server due to malformed \
             syntax. The message body will contain more information.",
        ),
        401 => Some(
            "Unauthorized - The request requires user authentication or, if the request included \
             authorization credentials, authorization has been refused for those credentials.",
        ),
        403 => Some("Forbidden - The server understood the request, but is refusing to fulfill it."),
        404 => Some(
            "Not Found - The requested resource could not be found. This error can be due to a \
             temporary or permanent condition.",
        ),
        429 => Some("Too Many Requests - Rate limiting has been applied."),
        500 => Some("Internal Server Error."),
        502 => Some(
            "Bad Gateway - The server was acting as a gateway or proxy and received an invalid \
             response from the upstream server.",
        ),
        503 => Some(
            "Service Unavailable - The server is currently unable to handle the request due to a \
             temporary condition which will be alleviated after some delay. You can choose to \
             resend the request again.",
        ),
        _ => None,
    }
}
