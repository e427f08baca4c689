// chainparams-cli: inspect, verify and re-mine network parameters
//
// Usage: chainparams-cli <command> [network] [args...]
// The network defaults to CHAINPARAMS_NETWORK, then "main".

use std::env;
use std::error::Error;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;

use colored::*;
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use chainparams::chainparams::{Network, create_chain_params, network_spec, select_params};
use chainparams::config::ToolConfig;
use chainparams::consensus::genesis::{GenesisNonce, discover_genesis};
use chainparams::crypto::pow::ScryptPow;
use chainparams::error::ChainParamsError;

type CliResult = Result<(), Box<dyn Error>>;

fn print_usage() {
    println!(
        "{}",
        "  Usage: chainparams-cli <command> [network] [args...]"
            .bright_yellow()
            .bold()
    );
    println!();
    println!("{}", "  Commands:".bright_white().bold());
    let commands = [
        ("show [network]", "Print the full parameter set as JSON"),
        ("genesis [network]", "Print the genesis block"),
        ("mine-genesis [network] [time]", "Search the genesis nonce from scratch"),
        ("verify", "Rebuild and check every network's genesis block"),
    ];
    for (usage, about) in commands {
        println!(
            "  {} {:<38} {}",
            "❯".bright_black(),
            usage.bright_green(),
            about.white()
        );
    }
    println!();
    println!(
        "  {}",
        "Networks: main, test, regtest. Set RUST_LOG=debug for search progress.".bright_black()
    );
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn cmd_show(network: &str) -> CliResult {
    let params = select_params(network)?;
    println!("{}", serde_json::to_string_pretty(&*params)?);
    Ok(())
}

fn cmd_genesis(network: &str) -> CliResult {
    let params = select_params(network)?;
    let genesis = params.genesis_block();
    let pow_hash = genesis.header.pow_hash(&ScryptPow::default());

    let tag = "[genesis]".bright_blue().bold();
    println!("{tag} network:     {}", params.network_id().bright_white().bold());
    println!("{tag} hash:        {}", params.genesis_hash());
    println!("{tag} pow hash:    {pow_hash}");
    println!("{tag} pow limit:   {}", params.consensus().pow_limit);
    println!("{tag} merkle root: {}", genesis.header.merkle_root);
    println!("{tag} nonce:       {}", genesis.header.nonce);
    println!();
    print!("{genesis}");
    Ok(())
}

fn cmd_mine_genesis(network: &str, time: Option<&String>, config: &ToolConfig) -> CliResult {
    let network: Network = network.parse()?;
    let spec = network_spec(network);

    let mut genesis = spec.genesis;
    genesis.nonce = GenesisNonce::Search;
    if let Some(raw) = time {
        genesis.time = raw.parse().map_err(|_| format!("invalid genesis time {raw}"))?;
    }

    println!(
        "{} mining {} genesis: time={} bits={:08x} limit={}",
        "[mine]".bright_magenta().bold(),
        network.as_str().bright_white().bold(),
        genesis.time,
        genesis.bits,
        spec.consensus.pow_limit
    );

    let stop = AtomicBool::new(false);
    let outcome = discover_genesis(
        network.as_str(),
        &genesis,
        &spec.consensus.pow_limit,
        &ScryptPow::default(),
        &config.search,
        &stop,
    )?;

    let tag = "[mine]".bright_magenta().bold();
    println!("{tag} {}", "genesis block mined".bright_green().bold());
    println!("{tag} nonce:       {}", outcome.nonce.to_string().bright_white().bold());
    println!("{tag} hash:        {}", outcome.block.block_hash());
    println!("{tag} pow hash:    {}", outcome.pow_hash);
    println!("{tag} merkle root: {}", outcome.block.header.merkle_root);
    println!("{tag} attempts:    {} ({:.2} H/s)", outcome.attempts, outcome.hash_rate());
    println!();
    print!("{}", outcome.block);
    Ok(())
}

fn cmd_verify() -> CliResult {
    let results: Vec<_> = Network::ALL
        .par_iter()
        .map(|&network| (network, create_chain_params(network)))
        .collect();

    let mut failures = 0;
    for (network, result) in results {
        match result {
            Ok(params) => println!(
                "{} {:<8} {}",
                "[ok]".bright_green().bold(),
                network.as_str(),
                params.genesis_hash()
            ),
            Err(e) => {
                failures += 1;
                println!("{} {:<8} {e}", "[fail]".bright_red().bold(), network.as_str());
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} network(s) failed genesis verification").into());
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let config = match ToolConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {e}", "[config]".bright_red().bold());
            return ExitCode::FAILURE;
        }
    };
    let network = args.get(2).map(String::as_str).unwrap_or(config.network.as_str());

    let result = match args[1].as_str() {
        "show" => cmd_show(network),
        "genesis" => cmd_genesis(network),
        "mine-genesis" => cmd_mine_genesis(network, args.get(3), &config),
        "verify" => cmd_verify(),
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("{} unknown command {other}", "[error]".bright_red().bold());
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let fatal = e.downcast_ref::<ChainParamsError>().is_some_and(ChainParamsError::is_fatal);
            let tag = if fatal { "[fatal]" } else { "[error]" };
            eprintln!("{} {e}", tag.bright_red().bold());
            ExitCode::FAILURE
        }
    }
}
