//! Demo client: creates a movement, reads it back, lists, and deletes it.

use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;
use workout_core::messages::{
    CreateMovementRequest, DeleteMovementRequest, GetMovementRequest, ListMovementsRequest,
};
use workout_core::WireCodec;
use workout_server::logging::{self, Environment};
use workout_server::transport::MovementClient;

#[derive(Debug, Parser)]
#[command(name = "workout-client")]
#[command(about = "Exercise the movement RPCs against a running server")]
struct Args {
    #[arg(long, env = "WORKOUT_SERVER_URL", default_value = "http://127.0.0.1:8070")]
    server: String,

    /// Payload codec: json or msgpack.
    #[arg(long, default_value = "json")]
    codec: WireCodec,

    #[arg(long, default_value_t = 5_000)]
    timeout_ms: u64,

    #[arg(long, default_value = "tenant-1")]
    tenant_id: String,

    #[arg(long, default_value = "bench press")]
    name: String,

    #[arg(long, default_value = "chest")]
    category_id: String,

    #[arg(long, env = "WORKOUT_ENV", default_value = "local")]
    env: Environment,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.env);

    let client = MovementClient::new(args.server.as_str())
        .with_codec(args.codec)
        .with_timeout(Duration::from_millis(args.timeout_ms));

    let created = client
        .create_movement(&CreateMovementRequest {
            tenant_id: args.tenant_id.clone(),
            name: args.name.clone(),
            category_id: args.category_id.clone(),
        })
        .await?;
    info!(response = ?created, "CreateMovement");
    let Some(movement) = created.data else {
        bail!("create failed: {}", created.error);
    };

    let fetched = client
        .get_movement(&GetMovementRequest {
            id: movement.id.clone(),
        })
        .await?;
    info!(response = ?fetched, "GetMovement");

    let listed = client
        .list_movements(&ListMovementsRequest {
            category_name: args.category_id.clone(),
        })
        .await?;
    info!(count = listed.data.len(), response = ?listed, "ListMovements");

    let deleted = client
        .delete_movement(&DeleteMovementRequest { id: movement.id })
        .await?;
    info!(response = ?deleted, "DeleteMovement");
    Ok(())
}
