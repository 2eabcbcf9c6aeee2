// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::path::Path;

use finboard::{cli, commands, config, sources::Sources, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut settings = config::load(matches.get_one::<String>("config").map(Path::new))
        .context("loading settings")?;
    if let Some(dir) = matches.get_one::<String>("data_dir") {
        settings = settings.with_data_dir(dir);
    }
    let mut sources = Sources::new(settings);

    match matches.subcommand() {
        Some(("annual", sub)) => commands::annual::handle(&mut sources, sub)?,
        Some(("monthly", sub)) => commands::monthly::handle(&mut sources, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&mut sources, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&mut sources)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
