//! Developer tasks for the workspace: `cargo xtask <command>`

use clap::{Parser, Subcommand};
use xshell::{Shell, cmd};

/// Library crates that carry doc tests and unit tests
const LIB_CRATES: &[&str] = &[
    "helius-rpc",
    "indexer-api",
    "indexing-config",
    "indexer-jobs",
    "webhook-receiver",
    "bin-util",
];

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Deny {
        #[clap(last = true)]
        args: Vec<String>,
    },
    Test {
        #[clap(short, long, default_value_t = false)]
        coverage: bool,
        #[clap(last = true)]
        args: Vec<String>,
    },
    Check,
    Fmt,
    Doc,
    UnusedDeps,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let sh = Shell::new()?;
    let args = Args::parse();

    match args.command {
        Commands::Deny { args } => {
            println!("cargo deny");
            cmd!(sh, "cargo install --version 0.17.0 cargo-deny").run()?;
            cmd!(sh, "cargo deny check {args...}").run()?;
        }
        Commands::Test { args, coverage } => {
            println!("cargo test");
            cmd!(sh, "cargo install cargo-nextest").run()?;

            for krate in LIB_CRATES {
                cmd!(sh, "cargo test --doc -p {krate}").run()?;
            }

            if coverage {
                cmd!(sh, "cargo install grcov").run()?;
                for (key, val) in [
                    ("CARGO_INCREMENTAL", "0"),
                    ("RUSTFLAGS", "-Cinstrument-coverage"),
                    ("LLVM_PROFILE_FILE", "target/coverage/%p-%m.profraw"),
                ] {
                    sh.set_var(key, val);
                }
            }

            let args = &args;
            cmd!(
                sh,
                "cargo nextest run --workspace --tests --all-targets --no-fail-fast {args...}"
            )
            .run()?;

            if coverage {
                cmd!(sh, "mkdir -p target/coverage").run()?;
                cmd!(sh, "grcov . --binary-path ./target/debug/deps/ -s . -t html,cobertura --branch --ignore-not-existing --ignore '../*' --ignore \"/*\" -o target/coverage/").run()?;

                if std::option_env!("CI").is_none() {
                    #[cfg(target_os = "macos")]
                    cmd!(sh, "open target/coverage/html/index.html").run()?;

                    #[cfg(target_os = "linux")]
                    cmd!(sh, "xdg-open target/coverage/html/index.html").run()?;
                }
            }
        }

        Commands::Check => {
            println!("cargo check");
            cmd!(
                sh,
                "cargo clippy --workspace --all-targets --locked -- -D warnings"
            )
            .run()?;
            cmd!(sh, "cargo fmt --all --check").run()?;
        }
        Commands::Fmt => {
            println!("cargo fix");
            cmd!(sh, "cargo fmt --all").run()?;
            cmd!(
                sh,
                "cargo fix --allow-dirty --allow-staged --workspace --all-features --tests"
            )
            .run()?;
            cmd!(
                sh,
                "cargo clippy --fix --allow-dirty --allow-staged --workspace --all-features --tests"
            )
            .run()?;
        }
        Commands::Doc => {
            println!("cargo doc");
            cmd!(sh, "cargo doc --workspace --no-deps").run()?;

            if std::option_env!("CI").is_none() {
                let opener = if cfg!(target_os = "macos") {
                    "open"
                } else {
                    "xdg-open"
                };
                for krate in LIB_CRATES {
                    let krate = krate.replace('-', "_");
                    cmd!(sh, "{opener} target/doc/{krate}/index.html").run()?;
                }
            }
        }
        Commands::UnusedDeps => {
            println!("unused deps");
            cmd!(sh, "cargo install --version 0.7.0 cargo-machete").run()?;
            cmd!(sh, "cargo-machete").run()?;
        }
    }

    Ok(())
}
