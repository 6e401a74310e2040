use std::io::Read;
use std::path::Path;
use std::{env, process};

use anyhow::{Context, Result};
use pobshare_config::Config;
use pobshare_engine::{Build, ImportConfig, Importer, ResolvedSource};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(input) = args.get(1) else {
        eprintln!("Usage: pobshare-cli <share-code | url | file | ->");
        eprintln!();
        eprintln!("Decodes a build share code and prints the build.");
        eprintln!("URLs are classified and their raw-content location printed;");
        eprintln!("this tool performs no network fetches itself.");
        process::exit(2);
    };

    if let Err(err) = run(input) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run(input: &str) -> Result<()> {
    let config = Config::load()
        .context("could not load config file")?
        .map(|file| file.apply(ImportConfig::default()))
        .unwrap_or_default();
    let importer = Importer::new(&config);

    let code = read_input(input)?;

    match importer.resolver().classify(&code)? {
        ResolvedSource::RawCode(code) => {
            let build = importer.decode_code(&code)?;
            print_build(&build);
        }
        ResolvedSource::FetchableUrl { host, url } => {
            println!("{host} paste; fetch the raw content and pass it back in:");
            println!("{url}");
        }
        ResolvedSource::UnsupportedUrl { host, guidance } => {
            println!("cannot import from {host}: {guidance}");
        }
    }

    Ok(())
}

/// The argument may be the code itself, `-` for stdin, or a path to a
/// file holding the code.
fn read_input(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("could not read share code from stdin")?;
        return Ok(buffer);
    }
    if Path::new(arg).is_file() {
        return std::fs::read_to_string(arg)
            .with_context(|| format!("could not read share code from {arg}"));
    }
    Ok(arg.to_string())
}

fn print_build(build: &Build) {
    let class = match build.ascendancy.as_str() {
        "" => build.class_name.clone(),
        ascendancy => format!("{} ({ascendancy})", build.class_name),
    };
    println!("Level {} {class}", build.level);
    if !build.main_skill.is_empty() {
        println!("Main skill: {}", build.main_skill);
    }
    println!("Bandit: {}", build.bandit);

    if !build.items.is_empty() {
        println!();
        println!("Items:");
        for (slot, item) in &build.items {
            println!("  {slot}: {} ({})", item.name, item.rarity.as_str());
            for m in &item.implicit_mods {
                println!("    {m}");
            }
            for m in &item.explicit_mods {
                println!("    {m}");
            }
        }
    }

    if !build.skills.is_empty() {
        println!();
        println!("Skills: {}", build.skills.join(", "));
    }

    if !build.stats.is_empty() {
        println!();
        println!("Stats:");
        for (stat, value) in &build.stats {
            println!("  {stat}: {value}");
        }
    }
}
