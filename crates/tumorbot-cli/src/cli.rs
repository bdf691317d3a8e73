use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use tumorbot_ai::PatientContext;

/// tumorbot: brain-tumor information chat grounded in reference sources.
#[derive(Parser, Debug)]
#[command(name = "tumorbot", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error) or a full
    /// filter directive.
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Overview of a tumor type.
    Info {
        tumor_type: String,
        #[arg(long, default_value = "")]
        location: String,
        /// Tumor size; 0 means unspecified.
        #[arg(long, default_value_t = 0.0)]
        size: f64,
    },
    /// Treatment options for a tumor type.
    Treatments { tumor_type: String },
    /// Symptoms of a tumor type, optionally at a location.
    Symptoms {
        tumor_type: String,
        #[arg(long, default_value = "")]
        location: String,
    },
    /// Chart-ready data for a tumor type.
    Visualize { tumor_type: String },
    /// Send one free-form message.
    Ask {
        message: String,
        #[command(flatten)]
        patient: PatientArgs,
        /// Print the reply as it streams in.
        #[arg(long)]
        stream: bool,
    },
    /// Interactive conversation on stdin.
    Chat {
        #[command(flatten)]
        patient: PatientArgs,
    },
}

#[derive(ClapArgs, Debug, Default)]
pub struct PatientArgs {
    /// Attach a patient-context turn for this tumor type.
    #[arg(long)]
    pub tumor_type: Option<String>,
    #[arg(long, requires = "tumor_type")]
    pub location: Option<String>,
    #[arg(long, requires = "tumor_type")]
    pub size: Option<f64>,
}

impl PatientArgs {
    pub fn to_context(&self) -> Option<PatientContext> {
        let tumor_type = self.tumor_type.as_ref()?;
        Some(
            PatientContext::new(tumor_type.as_str())
                .with_location(self.location.clone().unwrap_or_default())
                .with_size(self.size.unwrap_or(0.0)),
        )
    }
}

pub fn parse() -> Args {
    Args::parse()
}
