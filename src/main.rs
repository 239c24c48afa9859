// src/main.rs

use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use mslkf::simulation::csv::{setup_csv_output, write_records, write_track_records, RUN_HEADER, TRACK_HEADER};
use mslkf::simulation::load_parameters::load_scenario;
use mslkf::{run_simulation, run_tracking, Scenario};

/// 弾道目標の追尾・迎撃シミュレータ
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// カルマンフィルタ + 追跡誘導による迎撃シミュレーション
    Run(CommonArgs),
    /// 迎撃ミサイルなしで目標の追尾だけを行う
    Track(CommonArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// シナリオ YAML。省略時は既定値
    #[arg(long, short, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 出力 CSV
    #[arg(long, short, value_name = "FILE", default_value = "output/simulation_results.csv")]
    output: PathBuf,

    /// 乱数シード（設定ファイルより優先）
    #[arg(long)]
    seed: Option<u64>,

    /// DEBUG レベルのログを出力
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let (Command::Run(args) | Command::Track(args)) = &cli.command;
    init_logging(args.verbose);

    // 設定とシナリオの読み込み
    let mut scenario = match &args.config {
        Some(path) => {
            info!("loading scenario from {}", path.display());
            load_scenario(path)?
        }
        None => Scenario::default(),
    };
    if let Some(seed) = args.seed {
        scenario.seed = seed;
    }
    let mut rng = StdRng::seed_from_u64(scenario.seed);

    if let Some(dir) = args.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    match &cli.command {
        Command::Run(_) => {
            let outcome = run_simulation(&scenario, &mut rng)?;
            let mut writer = setup_csv_output(&args.output, RUN_HEADER)?;
            write_records(&mut writer, &outcome.records)?;

            match outcome.interception_step() {
                Some(step) => info!(step, "interception succeeded"),
                None => info!(
                    miss = outcome.final_miss_distance().unwrap_or(f64::NAN),
                    "interception failed"
                ),
            }
        }
        Command::Track(_) => {
            let outcome = run_tracking(&scenario, &mut rng)?;
            let mut writer = setup_csv_output(&args.output, TRACK_HEADER)?;
            write_track_records(&mut writer, &outcome.records)?;
        }
    }

    info!("results saved to {}", args.output.display());
    Ok(())
}

/// ログ出力の初期化
fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .init();
}
