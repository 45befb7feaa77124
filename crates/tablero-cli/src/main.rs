// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use runtime::PrefsRuntime;
use std::env;
use std::path::PathBuf;
use tablero_app::template::TemplateSpec;
use tablero_prefs::PrefStore;
use tablero_tui::PreviewEnv;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `tablero --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let prefs_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.prefs_path()?
    };
    if options.print_prefs_path {
        println!("{}", prefs_path.display());
        return Ok(());
    }

    let store = if options.demo {
        PrefStore::open_memory()?
    } else {
        PrefStore::open(&prefs_path).with_context(|| {
            format!(
                "open preference store {} -- if this path is wrong, set [storage].prefs_path or TABLERO_PREFS_PATH",
                prefs_path.display()
            )
        })?
    };
    store.bootstrap()?;

    let env = PreviewEnv {
        current_path: config.current_path().to_owned(),
        viewport_width: config.viewport_width(),
        options: config.enhance_options()?,
    };
    if options.check_only {
        return Ok(());
    }

    let spec = if options.demo {
        TemplateSpec::demo()
    } else {
        TemplateSpec::sample()
    };
    let mut runtime = PrefsRuntime::new(&store, spec);
    tablero_tui::run_app(&mut runtime, &env)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_prefs_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_prefs_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-prefs-path" => {
                options.print_prefs_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("tablero");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-prefs-path       Print resolved preference store path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch with the larger demo page (in-memory prefs)");
    println!("  --check                  Validate config + preference store");
    println!("  --help                   Show this help");
}
