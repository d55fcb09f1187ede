//! Level and on/off command handlers.

use std::time::Duration;

use plumly_core::{LightpadId, Platform};
use serde::Serialize;

use crate::cli::{GlobalOpts, LevelArgs, LevelCommand, TargetArgs};
use crate::error::CliError;
use crate::output::{Detailed, Printer};

use super::util;

#[derive(Serialize)]
struct LevelView {
    lpid: String,
    on: bool,
    brightness: u8,
}

impl Detailed for LevelView {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Lightpad", self.lpid.clone()),
            ("On", if self.on { "yes" } else { "no" }.into()),
            ("Level", format!("{}%", self.brightness)),
        ]
    }

    fn key(&self) -> String {
        self.brightness.to_string()
    }
}

fn print_level(global: &GlobalOpts, lpid: &LightpadId, percent: u8) {
    Printer::new(global).detail(&LevelView {
        lpid: lpid.to_string(),
        on: percent > 0,
        brightness: percent,
    });
}

/// Run `op` against a started platform, shutting it down either way.
async fn with_device<T, F, Fut>(target: &TargetArgs, global: &GlobalOpts, op: F) -> Result<T, CliError>
where
    F: FnOnce(Platform, LightpadId) -> Fut,
    Fut: Future<Output = Result<T, CliError>>,
{
    let lpid = LightpadId::from(target.lpid.as_str());
    let platform = util::start_for_device(global, &lpid, Duration::from_secs(target.wait)).await?;
    let result = op(platform.clone(), lpid).await;
    platform.shutdown().await;
    result
}

pub async fn handle(args: LevelArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        LevelCommand::Get(target) => {
            let (lpid, percent) = with_device(&target, global, |platform, lpid| async move {
                let percent = platform.get_brightness(&lpid).await?;
                Ok::<_, CliError>((lpid, percent))
            })
            .await?;
            print_level(global, &lpid, percent);
            Ok(())
        }
        LevelCommand::Set { target, percent } => {
            let lpid = with_device(&target, global, |platform, lpid| async move {
                platform.set_brightness(&lpid, percent).await?;
                Ok::<_, CliError>(lpid)
            })
            .await?;
            print_level(global, &lpid, percent);
            Ok(())
        }
    }
}

pub async fn handle_switch(target: &TargetArgs, on: bool, global: &GlobalOpts) -> Result<(), CliError> {
    let (lpid, brightness) = with_device(target, global, |platform, lpid| async move {
        let brightness = platform.switch(&lpid, on).await?;
        Ok::<_, CliError>((lpid, brightness))
    })
    .await?;
    print_level(global, &lpid, brightness);
    Ok(())
}
