use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use ocr_nn::{
    metrics::{argmax, class_symbol}, read_png_file, train::load_dataset, EngineConfig, Topology,
    TopologySpec, TrainConfig,
};

#[derive(Parser)]
#[command(name = "ocr-nn")]
#[command(about = "Feedforward neural network for optical character recognition", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration (JSON); defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Weight file
    #[arg(short, long, global = true, default_value = ocr_nn::network::WEIGHTS_FILE)]
    weights: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a topology, draw random weights and write the weight file
    Init {
        /// Topology description (JSON); a single 256-128-36 net when omitted
        #[arg(short, long)]
        topology: Option<PathBuf>,

        #[arg(long, default_value = "1")]
        seed: u64,
    },

    /// Train on a directory holding one sub-directory of PNGs per class
    Train {
        data: PathBuf,

        /// Held-out directory evaluated after every epoch
        #[arg(long)]
        validation: Option<PathBuf>,

        #[arg(short, long, default_value = "10")]
        epochs: usize,

        #[arg(short, long, default_value = "16")]
        batch_size: usize,

        #[arg(long, default_value = "1")]
        seed: u64,
    },

    /// Classify a single PNG image
    Classify { image: PathBuf },

    /// Print the feature vector of a PNG image
    Features { image: PathBuf },
}

fn load_config(path: &Option<PathBuf>) -> ocr_nn::Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::load_json(&p.to_string_lossy()),
        None => Ok(EngineConfig::default()),
    }
}

fn execute(cli: Cli) -> ocr_nn::Result<()> {
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Init { topology, seed } => {
            let spec = match topology {
                Some(p) => TopologySpec::load_json(&p.to_string_lossy())?,
                None => TopologySpec::single(config.input_len(), vec![128, config.max_classes]),
            };
            let mut net = Topology::assemble(&spec, config)?;
            net.init_random_weights(&mut StdRng::seed_from_u64(seed));
            net.save_weights_file(&cli.weights)?;
        }
        Commands::Train { data, validation, epochs, batch_size, seed } => {
            let train_config = TrainConfig::new(epochs, batch_size);
            train_config.validate()?;
            let mut net = Topology::load_weights_file(&cli.weights, config.clone())?;
            let classes = net.num_classes();
            let train = load_dataset(&data, &config, classes)?;
            let validation = validation.map(|v| load_dataset(v, &config, classes)).transpose()?;
            if train.is_empty() {
                return Err(ocr_nn::Error::Format(format!("no samples found in {}", data.display())));
            }
            let mut rng = StdRng::seed_from_u64(seed);
            ocr_nn::train_loop(
                &mut net,
                &train,
                validation.as_deref(),
                &train_config,
                &mut rng,
            );
            net.save_weights_file(&cli.weights)?;
        }
        Commands::Classify { image } => {
            let mut net = Topology::load_weights_file(&cli.weights, config.clone())?;
            let input = read_png_file(&image, &config, false)?;
            let output = net.run(&input);
            let (index, value) = argmax(&output);
            let symbol = class_symbol(index).unwrap_or('?');
            println!("{}: {} ({:.4})", image.display(), symbol, value);
        }
        Commands::Features { image } => {
            let input = read_png_file(&image, &config, true)?;
            info!("{} values", input.len());
            let line: Vec<String> = input.iter().map(|v| format!("{v:.6}")).collect();
            println!("{}", line.join(" "));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match execute(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
