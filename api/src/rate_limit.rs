//! ログイン試行の IP 単位レート制限

use adapter::rate_limit::LimitedAction;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use registry::AppRegistry;
use std::net::SocketAddr;

pub async fn login_rate_limit(
    State(registry): State<AppRegistry>,
    request: Request,
    next: Next,
) -> Response {
    let ip = extract_ip(&request);
    match registry.rate_limiter().acquire(LimitedAction::Login, &ip).await {
        Ok(()) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

fn extract_ip(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        // 先頭がクライアントの元のアドレス
        if let Some(first) = forwarded.split(',').next() {
            let ip = first.trim();
            if !ip.is_empty() {
                return ip.to_owned();
            }
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn forwarded_header_wins_over_peer_address() {
        let mut request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        assert_eq!(extract_ip(&request), "203.0.113.7");
    }

    #[test]
    fn falls_back_to_peer_address() {
        let mut request = Request::builder().body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4000))));
        assert_eq!(extract_ip(&request), "192.0.2.1");

        let bare = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(extract_ip(&bare), "unknown");
    }
}
