//! ledring — drive an LED ring through a remote light-management REST service.
//!
//! Layers, bottom-up: [`credential`] resolves the group id, [`client`] issues
//! paced requests and retries rate-limited ones, [`service`] maps the four
//! light operations onto remote paths, and [`controller`] composes them into
//! bulk power-off, chase and wheel animations, and a clock face.

pub mod client;
pub mod color;
pub mod config;
pub mod controller;
pub mod credential;
pub mod error;
pub mod light;
pub mod retry;
pub mod service;
pub mod transport;
pub mod wait;

pub use error::LedringError;

use client::RemoteClient;
use config::Config;
use controller::LedController;
use service::RemoteLightService;
use transport::ReqwestTransport;
use wait::Sleeper;

/// Light service over HTTP, as built by [`connect`].
pub type HttpLightService<W> = RemoteLightService<ReqwestTransport, W>;

/// Build a controller talking to the configured service.
///
/// `sleeper` is shared by the client's pacing and backoff and by the
/// controller's animation delays, so one cancellation stops both. The group
/// id is resolved lazily, on the first request.
pub fn connect<W: Sleeper + Clone>(
    config: &Config,
    group_override: Option<&str>,
    sleeper: W,
) -> error::Result<LedController<HttpLightService<W>, W>> {
    let ring = config.ring()?;
    let transport = ReqwestTransport::new(&config.api.base_url, config.timeout())?;
    let client = RemoteClient::new(
        transport,
        sleeper.clone(),
        config.credential_resolver(group_override),
        config.retry_config(),
    )
    .with_group_header(config.api.group_header.clone());
    let service = RemoteLightService::new(client, config.endpoints());
    log::debug!(
        "connected to {} (ring {:?})",
        config.api.base_url,
        ring.ids()
    );
    Ok(LedController::new(service, sleeper, ring))
}
