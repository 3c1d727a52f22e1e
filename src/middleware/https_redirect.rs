// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Production HTTPS redirect middleware.

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

/// Redirect plain-HTTP requests to their HTTPS equivalent.
///
/// Only installed in production mode, where the app sits behind a proxy
/// that sets `x-forwarded-proto`. Requests with no Host header pass
/// through untouched since there is nothing to redirect to.
pub async fn force_https(request: Request, next: Next) -> Response {
    let forwarded_proto = request
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok());

    if forwarded_proto != Some("https") {
        if let Some(host) = request
            .headers()
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
        {
            let target = format!("https://{}{}", host, request.uri());
            return Redirect::temporary(&target).into_response();
        }
    }

    next.run(request).await
}
