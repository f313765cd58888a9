use axum::http::StatusCode;

/// Handler for `GET /healthz`: the process is up.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Fold named dependency probes into a readiness status.
///
/// Any failed probe is logged and turns the result into 503.
pub fn readiness<E: std::fmt::Display>(probes: &[(&str, Result<(), E>)]) -> StatusCode {
    let mut status = StatusCode::OK;
    for (name, result) in probes {
        if let Err(e) = result {
            tracing::warn!(dependency = *name, error = %e, "readiness probe failed");
            status = StatusCode::SERVICE_UNAVAILABLE;
        }
    }
    status
}
