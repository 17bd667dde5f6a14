use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_BOUNDARY_MARKER: &str =
    "Aprovado pela Instrução Normativa RFB nº 2.060, de 13 de dezembro de 2021";

#[derive(Parser, Debug)]
#[command(
    name = "informes",
    version,
    about = "Splits combined informe de rendimentos PDFs and renames them by holder name"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a combined PDF into one file per report
    Split(SplitArgs),
    /// Rename per-report PDFs after the holder name found in their text
    Rename(RenameArgs),
    /// Split and then rename in one pass
    Run(RunArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    /// Combined multi-report PDF
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long, default_value = "pdf")]
    pub output_dir: PathBuf,

    /// Text that marks the final page of each report
    #[arg(long, default_value = DEFAULT_BOUNDARY_MARKER)]
    pub marker: String,

    /// Maximum edit distance (exclusive) for fuzzy marker matching
    #[arg(long, default_value_t = 5)]
    pub fuzzy_threshold: usize,

    /// Drop trailing pages after the last marker instead of writing them out
    #[arg(long, default_value_t = false)]
    pub no_flush_remainder: bool,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum IdFormat {
    Cpf,
    Cnpj,
}

impl IdFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cpf => "cpf",
            Self::Cnpj => "cnpj",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RenameArgs {
    #[arg(long, default_value = "pdf")]
    pub directory: PathBuf,

    /// Labels that precede the holder name, tried in order
    #[arg(long = "keyword", default_values = [
        "Nome Completo",
        "Nome Empresarial",
        "Razão Social",
    ])]
    pub keywords: Vec<String>,

    /// Taxpayer-ID formats stripped from candidate names
    #[arg(long = "id-format", value_enum, default_values = ["cpf", "cnpj"])]
    pub id_formats: Vec<IdFormat>,

    /// Boilerplate that follows the name; the candidate is cut at the first occurrence
    #[arg(long = "trailing-marker", default_values = [
        "Natureza do Rendimento",
        "Rendimentos do trabalho assalariado",
        "Rendimentos Tributáveis",
    ])]
    pub trailing_markers: Vec<String>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Combined multi-report PDF
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long, default_value = "pdf")]
    pub output_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_BOUNDARY_MARKER)]
    pub marker: String,

    #[arg(long, default_value_t = 5)]
    pub fuzzy_threshold: usize,

    #[arg(long, default_value_t = false)]
    pub no_flush_remainder: bool,

    #[arg(long = "keyword", default_values = [
        "Nome Completo",
        "Nome Empresarial",
        "Razão Social",
    ])]
    pub keywords: Vec<String>,

    #[arg(long = "id-format", value_enum, default_values = ["cpf", "cnpj"])]
    pub id_formats: Vec<IdFormat>,

    #[arg(long = "trailing-marker", default_values = [
        "Natureza do Rendimento",
        "Rendimentos do trabalho assalariado",
        "Rendimentos Tributáveis",
    ])]
    pub trailing_markers: Vec<String>,

    #[arg(long)]
    pub split_manifest_path: Option<PathBuf>,

    #[arg(long)]
    pub rename_manifest_path: Option<PathBuf>,
}
