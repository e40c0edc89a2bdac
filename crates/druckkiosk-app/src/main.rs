// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Druckkiosk — self-service print-and-pay kiosk.
//
// Entry point. Initialises logging and backend services, then serves the
// kiosk web form on localhost.

mod routes;
mod services;

use services::KioskServices;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Druckkiosk starting");

    let services = match KioskServices::init() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "kiosk services failed to initialise");
            std::process::exit(1);
        }
    };

    let port = services.config().listen_port;
    let app = routes::router(services);

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!(%addr, "kiosk listening");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind kiosk port");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "kiosk server exited with error");
        std::process::exit(1);
    }
}
