use anyhow::Context as _;
use chomsky::{grammar::Grammar, normalize, syntax, Recognizer};
use clap::Parser;
use std::{
    fs,
    io::{self, Read as _, Write as _},
    path::PathBuf,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The path of grammar definition file.
    input: PathBuf,

    /// The path of the word list. Read from the standard input if omitted.
    #[arg(short, long)]
    words: Option<PathBuf>,

    /// Print the grammar in Chomsky normal form before the answers.
    #[arg(long)]
    dump: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    tracing::trace!("CLI args = {:?}", args);

    let grammar = Grammar::from_file(&args.input)
        .with_context(|| format!("failed to load the grammar from {}", args.input.display()))?;
    let cnf = normalize(&grammar).context("failed to normalize the grammar")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.dump {
        write!(out, "{}", cnf)?;
    }

    let source = match &args.words {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read the word list {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read the word list from stdin")?;
            buf
        }
    };
    let words = syntax::parse_words(&source).context("invalid word list")?;

    let recognizer = Recognizer::new(&cnf);
    for (word, yes) in words.iter().zip(recognizer.recognize_all(&words)) {
        tracing::debug!("{:?}: {}", word, yes);
        writeln!(out, "{}", if yes { "Yes" } else { "No" })?;
    }
    out.flush()?;

    Ok(())
}
