//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "modapte", about = "Reuters-21578 corpus preparation tool.")]
/// Holds every command that is callable by the `modapte` command.
pub enum Modapte {
    #[structopt(about = "Download a corpus archive, resuming partial files")]
    Download(Download),
    #[structopt(about = "Run the corpus preparation pipeline")]
    Pipeline(Pipeline),
    #[structopt(about = "Extract text length features from a prepared corpus")]
    Features(Features),
}

#[derive(Debug, StructOpt)]
/// Download command and parameters.
pub struct Download {
    #[structopt(help = "archive url")]
    pub url: String,
    #[structopt(parse(from_os_str), help = "download destination")]
    pub dst: PathBuf,
}

#[derive(Debug, StructOpt)]
/// Pipeline command and parameters.
pub struct Pipeline {
    #[structopt(parse(from_os_str), help = "source (contains reut2-*.sgm)")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "pipeline result destination")]
    pub dst: PathBuf,
    #[structopt(
        long = "multiclass",
        help = "keep only documents carrying exactly one topic"
    )]
    pub multiclass: bool,
    #[structopt(
        long = "top-n",
        default_value = "10",
        help = "number of categories in the dataset"
    )]
    pub top_n: usize,
}

#[derive(Debug, StructOpt)]
/// Features command and parameters.
pub struct Features {
    #[structopt(parse(from_os_str), help = "prepared corpus (documents.jsonl)")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "feature csv destination")]
    pub dst: PathBuf,
}
