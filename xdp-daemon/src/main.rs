use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use xdp_daemon::config::Args;
use xdp_daemon::logging;
use xdp_daemon::service::RfdFileChooser;
use zbus::fdo::{RequestNameFlags, RequestNameReply};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing(&args);

    let connection = zbus::connection::Builder::session()?
        .serve_at(args.object_path.as_str(), RfdFileChooser::rfd())?
        .build()
        .await
        .context("connecting to the session bus")?;

    let mut flags = RequestNameFlags::AllowReplacement | RequestNameFlags::DoNotQueue;
    if args.replace {
        flags |= RequestNameFlags::ReplaceExisting;
    }
    let reply = connection
        .request_name_with_flags(args.bus_name.as_str(), flags)
        .await
        .with_context(|| format!("requesting {}", args.bus_name))?;
    match reply {
        RequestNameReply::PrimaryOwner | RequestNameReply::AlreadyOwner => {
            info!(bus_name = %args.bus_name, object_path = %args.object_path, "file chooser ready");
        }
        other => bail!(
            "{} is owned by another process ({other:?}); pass --replace to take it over",
            args.bus_name
        ),
    }

    tokio::signal::ctrl_c()
        .await
        .context("waiting for the interrupt signal")?;
    info!("interrupted; shutting down");
    Ok(())
}
