use anyhow::Result;
use tracing::{info, trace};

use super::initdb::connect_and_migrate;
use super::serve::run_server;
use crate::config::{app_state, Settings};
use crate::router::create_router;

pub async fn migrate_and_serve(settings: &Settings) -> Result<()> {
    trace!("Entering migrate_and_serve function");
    info!("Applying database migrations and starting server");

    let db = connect_and_migrate(&settings.database_url).await?;
    let state = app_state(db, settings.request_timeout());

    run_server(create_router(state), &settings.bind_address).await
}
