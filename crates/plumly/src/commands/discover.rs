//! Discovery command: broadcast and list answering lightpads.
//!
//! Needs no cloud credentials; only the network settings are read.

use std::time::Duration;

use plumly_core::{AddressRecord, AddressResolver, CoreError};
use tabled::Tabled;
use tracing::{debug, warn};

use crate::cli::{DiscoverArgs, GlobalOpts};
use crate::error::CliError;
use crate::output::{Listed, Printer};

use super::util;

#[derive(Tabled)]
pub struct AnnouncementRow {
    #[tabled(rename = "Lightpad")]
    lpid: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Port")]
    port: u16,
    #[tabled(rename = "Last seen")]
    last_seen: String,
}

impl Listed for AddressRecord {
    type Row = AnnouncementRow;

    fn row(&self) -> AnnouncementRow {
        AnnouncementRow {
            lpid: self.lpid.to_string(),
            address: self.address.to_string(),
            port: self.command_port,
            last_seen: self.last_seen.format("%H:%M:%S").to_string(),
        }
    }

    fn key(&self) -> String {
        self.lpid.to_string()
    }
}

pub async fn handle(args: DiscoverArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = util::load_config(global)?;
    let network = plumly_config::to_network_config(&cfg)?;

    let resolver = AddressResolver::new();
    let socket = resolver.start_discovery(network.discovery_port).await?;
    debug!(port = network.discovery_port, wait = args.wait, "collecting discovery answers");

    let deadline = tokio::time::sleep(Duration::from_secs(args.wait));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            () = &mut deadline => break,
            received = socket.recv() => match received {
                Ok((raw, sender)) => {
                    resolver.on_discovery_response(&raw, sender);
                }
                Err(e) => {
                    warn!(error = %e, "discovery socket failed");
                    return Err(CoreError::Discovery(e).into());
                }
            },
        }
    }

    Printer::new(global).list(&resolver.snapshot());
    Ok(())
}
