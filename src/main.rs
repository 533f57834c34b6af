//! # modapte
//!
//! Corpus preparation pipeline for the Reuters-21578 news corpus.
//!
//! This project can be used both as a tool to download and prepare the
//! corpus, or as a lib to integrate parsing and processing into other
//! projects.
//!
//! ## Getting started
//!
//! ```sh
//! modapte 0.1.0
//! Reuters-21578 corpus preparation tool.
//!
//! USAGE:
//!     modapte <SUBCOMMAND>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!
//! SUBCOMMANDS:
//!     download    Download a corpus archive, resuming partial files
//!     features    Extract text length features from a prepared corpus
//!     help        Prints this message or the help of the given subcommand(s)
//!     pipeline    Run the corpus preparation pipeline
//! ```
use structopt::StructOpt;

#[macro_use]
extern crate log;

use modapte::download::Downloader;
use modapte::error;
use modapte::pipelines::{ModApte, Pipeline};
use modapte::processing::features::{write_feature_csv, TextColumn};

mod cli;

fn main() -> Result<(), error::Error> {
    env_logger::init();

    let opt = cli::Modapte::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::Modapte::Download(d) => {
            let dl = Downloader::default();
            let size = dl.download(&d.url, &d.dst)?;
            info!("{:?}: {} bytes", d.dst, size);
        }

        cli::Modapte::Pipeline(p) => {
            let p = ModApte::new(p.src, p.dst, p.multiclass, p.top_n);
            p.run()?;
        }

        cli::Modapte::Features(f) => {
            write_feature_csv(&f.src, &f.dst, &[TextColumn::Title, TextColumn::Body])?;
        }
    };
    Ok(())
}
