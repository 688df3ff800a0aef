use clap::Parser;
use sage_core::SageConfig;
use std::path::PathBuf;

/// Command-line arguments for the sage CLI
#[derive(Parser, Debug)]
#[command(name = "sage")]
#[command(about = "Plan and execute a research goal with an LLM agent", long_about = None)]
pub struct Cli {
    /// Research goal; prompted for when absent
    #[arg(short, long, help = "Goal to pursue; prompts for one when omitted")]
    pub goal: Option<String>,

    /// Config file overriding the default location
    #[arg(short, long, help = "Config file (defaults to ~/.sage/config.toml)")]
    pub config: Option<PathBuf>,

    /// Folder of documents to summarize
    #[arg(long, help = "Folder of documents to summarize (overrides config)")]
    pub documents: Option<PathBuf>,

    /// Root of the classification corpus
    #[arg(long, help = "Newsgroup corpus root (overrides config)")]
    pub corpus: Option<PathBuf>,

    /// Log file path
    #[arg(long, help = "Log file (overrides config)")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Writes command-line overrides into `config`.
    pub fn apply_overrides(&self, config: &mut SageConfig) {
        if let Some(documents) = &self.documents {
            config.data.documents_dir.clone_from(documents);
        }
        if let Some(corpus) = &self.corpus {
            config.data.corpus_dir.clone_from(corpus);
        }
        if let Some(log_file) = &self.log_file {
            config.logging.file.clone_from(log_file);
        }
    }
}
