use serde::Serialize;

use super::CmdResult;
use crate::cli::commands::ConfigAction;
use crate::cli::context::Context;
use crate::io::config_io;
use crate::model::config::Config;

#[derive(Serialize)]
struct ConfigJson<'a> {
    path: String,
    board_id: &'a str,
    #[serde(flatten)]
    config: &'a Config,
}

pub(super) fn cmd_config(ctx: &Context, action: ConfigAction) -> CmdResult {
    match action {
        ConfigAction::Show => {
            if ctx.json {
                let json = ConfigJson {
                    path: ctx.config_path.display().to_string(),
                    board_id: &ctx.session.board_id,
                    config: &ctx.config,
                };
                println!("{}", serde_json::to_string_pretty(&json)?);
            } else {
                println!("# {}", ctx.config_path.display());
                println!("# board: {}", ctx.session.board_id);
                print!("{}", toml::to_string_pretty(&ctx.config)?);
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let (_config, mut doc) = config_io::read_config(&ctx.config_path)?;
            config_io::set_value(&mut doc, &key, &value)?;
            config_io::write_config(&ctx.config_path, &doc)?;
            tracing::info!(%key, "config updated");
            Ok(())
        }
    }
}
