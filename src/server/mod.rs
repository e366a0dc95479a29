//! HTTP front end.
//!
//! One endpoint: `GET /?domain=<name>` answers with every configured
//! resolver's result as JSON. Errors use the `{"code", "message"}` shape
//! with the same status code. All responses allow any origin.
//!
//! # Example
//!
//! ```rust,ignore
//! use dnscheck::{check::Checker, config::CsvFile, server};
//! use std::sync::Arc;
//!
//! let service = server::DnsCheckService::new(Arc::new(CsvFile::new("list.csv")), Checker::default());
//! let listener = server::bind("0.0.0.0:8080".parse()?).await?;
//! server::serve(listener, service, async { tokio::signal::ctrl_c().await.ok(); }).await;
//! ```

mod handler;

pub use handler::{domain_param, DnsCheckService, DOMAIN_PARAM};

use crate::base::checkerror::CheckError;
use hyper::{body::Incoming, server::conn::http1, service::service_fn, Request};
use hyper_util::rt::TokioIo;
use std::{convert::Infallible, future::Future, net::SocketAddr, time::Duration};
use tokio::net::TcpListener;

/// Pause after a failed `accept`, so fd exhaustion does not spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Bind the listening socket.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, CheckError> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| CheckError::io(format!("failed to listen on {addr}"), e))
}

/// Accept connections until `shutdown` resolves, serving each one on its
/// own task. Connections already accepted run to completion.
pub async fn serve<F>(listener: TcpListener, service: DnsCheckService, shutdown: F)
where
    F: Future<Output = ()>,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(addr = %addr, "listening");
    }
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("shutting down");
                return;
            }
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            },
        };

        let service = service.clone();
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let svc = service_fn(move |req: Request<Incoming>| {
                let service = service.clone();
                async move { Ok::<_, Infallible>(service.handle(req.uri()).await) }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, svc).await {
                tracing::debug!(peer = %peer, error = %e, "connection error");
            }
        });
    }
}
