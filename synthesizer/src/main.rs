use clap::Parser;
use generator::profile::SyntheticEventConfig;
use iqsynthcore::SignalDomain;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Labeled I/Q dataset synthesizer")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Event manifest listing egg files and their swept parameters
    #[arg(long)]
    manifest: Option<PathBuf>,
    /// Generate this many synthetic events instead of reading eggs
    #[arg(long, conflicts_with = "manifest")]
    synthetic: Option<usize>,
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    /// Noise temperature in kelvin; replaces any configured sweep
    #[arg(long)]
    temperature: Option<f64>,
    /// Signal domain of the generated features: time or freq
    #[arg(long)]
    domain: Option<SignalDomain>,
}

impl Args {
    fn apply(&self, config: &mut WorkflowConfig) {
        if let Some(manifest) = &self.manifest {
            config.manifest = Some(manifest.clone());
        }
        if let Some(n_events) = self.synthetic {
            config.manifest = None;
            let synthetic = config
                .synthetic
                .get_or_insert_with(SyntheticEventConfig::default);
            synthetic.n_events = n_events;
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(seed) = self.seed {
            config.synthesis.seed = seed;
        }
        if let Some(temperature) = self.temperature {
            config.synthesis.noise.temperature_k = temperature;
            config.temperatures.clear();
        }
        if let Some(domain) = self.domain {
            config.domain = domain;
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::default()
    };
    args.apply(&mut workflow_config);

    let runner = Runner::new(workflow_config);
    let events = runner.load_events()?;
    let summaries = runner.execute(&events)?;

    for summary in &summaries {
        let splits = summary
            .rows
            .iter()
            .map(|(name, (signal, noise))| format!("{}={}+{}", name, signal, noise))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "T={}K -> {} [{}]",
            summary.temperature_k,
            summary.output.display(),
            splits
        );
    }

    Ok(())
}
