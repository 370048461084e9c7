use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::Router;
use estudio_core_contact_contracts::ContactFeatureService;
use estudio_core_health_contracts::HealthFeatureService;
use estudio_di::Build;
use tokio::net::TcpListener;
use tracing::info;

mod extractors;
mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone, Build)]
pub struct RestServer<Health, Contact> {
    config: RestServerConfig,
    health: Health,
    contact: Contact,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub real_ip: Option<Arc<RealIpConfig>>,
}

/// Trust a client ip header, but only when the connection comes from the
/// reverse proxy at `set_from`.
#[derive(Debug, Clone)]
pub struct RealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

impl<Health, Contact> RestServer<Health, Contact>
where
    Health: HealthFeatureService,
    Contact: ContactFeatureService,
{
    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let router = self
            .router()
            .into_make_service_with_connect_info::<SocketAddr>();
        let listener = TcpListener::bind((host, port)).await?;
        info!("Listening on {host}:{port}");
        axum::serve(listener, router).await.map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let real_ip = self.config.real_ip.clone();

        let router = Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(self.contact.into()));

        // Layers run top-down for incoming requests: the outermost (last
        // added) assigns the request context the trace span needs.
        let router = middlewares::panic_handler::add(router);
        let router = middlewares::cors::add(router);
        let router = middlewares::trace::add(router);
        middlewares::context::add(router, real_ip)
    }
}
