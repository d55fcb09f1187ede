//! Devices command: start the platform and list every known lightpad.
//!
//! With `--watch` the list is printed again on every registry change until
//! interrupted.

use std::sync::Arc;
use std::time::Duration;

use plumly_core::{DeviceHandle, Platform};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{DevicesArgs, GlobalOpts};
use crate::error::CliError;
use crate::output::{Listed, Printer};

use super::util;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct DeviceView {
    lpid: String,
    name: String,
    room: String,
    load: String,
    llid: String,
    reachable: bool,
    address: Option<String>,
    on: bool,
    brightness: u8,
}

impl DeviceView {
    fn new(handle: &DeviceHandle, platform: &Platform) -> Self {
        let address = platform
            .resolver()
            .lookup(&handle.lpid)
            .map(|r| format!("{}:{}", r.address, r.command_port));
        Self {
            lpid: handle.lpid.to_string(),
            name: handle.name.clone(),
            room: handle.context.room.name.clone(),
            load: handle.context.load.name.clone(),
            llid: handle.llid().to_owned(),
            reachable: handle.reachable,
            address,
            on: handle.characteristics.on,
            brightness: handle.characteristics.brightness,
        }
    }
}

#[derive(Tabled)]
pub struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Lightpad")]
    lpid: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Load")]
    load: String,
    #[tabled(rename = "Reachable")]
    reachable: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Level")]
    level: String,
}

impl Listed for DeviceView {
    type Row = DeviceRow;

    fn row(&self) -> DeviceRow {
        DeviceRow {
            name: self.name.clone(),
            lpid: self.lpid.clone(),
            room: self.room.clone(),
            load: self.load.clone(),
            reachable: if self.reachable { "yes" } else { "no" }.into(),
            address: self.address.clone().unwrap_or_else(|| "-".into()),
            level: format!("{}%", self.brightness),
        }
    }

    fn key(&self) -> String {
        self.lpid.clone()
    }
}

fn print_devices(printer: &Printer, platform: &Platform, handles: &[Arc<DeviceHandle>]) {
    let views: Vec<DeviceView> = handles.iter().map(|h| DeviceView::new(h, platform)).collect();
    printer.list(&views);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let platform = util::build_platform(global)?;
    platform.start_discovery().await?;
    if let Err(e) = platform.refresh_topology().await {
        platform.shutdown().await;
        return Err(e.into());
    }

    let printer = Printer::new(global);
    let result = if args.watch {
        watch(&printer, &platform).await
    } else {
        tokio::time::sleep(Duration::from_secs(args.wait)).await;
        print_devices(&printer, &platform, &platform.registry().snapshot());
        Ok(())
    };
    platform.shutdown().await;
    result
}

/// Print the list now and again after every registry change, until Ctrl+C.
async fn watch(printer: &Printer, platform: &Platform) -> Result<(), CliError> {
    let mut handles = platform.registry().subscribe();
    print_devices(printer, platform, handles.current());

    loop {
        tokio::select! {
            biased;
            signal = tokio::signal::ctrl_c() => {
                signal?;
                return Ok(());
            }
            changed = handles.changed() => match changed {
                Some(snapshot) => print_devices(printer, platform, &snapshot),
                None => return Ok(()),
            },
        }
    }
}
