use anyhow::Result;
use clap::Parser;
use time_quick_sort::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr, defaulting to info; results go to stdout
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // usage errors exit 1; --help and --version exit 0
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    match cli.command {
        Command::Sort(args) => {
            let elapsed_ms = sort_file(&args)?;
            println!("{}", elapsed_ms);
        }

        Command::Batch(args) => {
            let prompted = if args.interactive {
                prompt_groups(std::io::stdin().lock(), std::io::stdout())?
            } else {
                Vec::new()
            };

            let config = args.resolve(prompted)?;
            config.validate()?;

            let outcome = run_batch(&config)?;

            let ms = |v: Option<f64>| v.unwrap_or(f64::NAN);
            println!("Input Size\tSamples\tMean (ms)\tStd Dev (ms)\tMin (ms)\tMax (ms)");
            for summary in outcome.table.summaries() {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    summary.label,
                    summary.count,
                    ms(summary.mean),
                    ms(summary.std_dev),
                    ms(summary.min),
                    ms(summary.max)
                );
            }
            println!("Reports written to {}", config.output_dir.display());

            if !outcome.is_success() {
                anyhow::bail!(
                    "{} of {} inputs failed",
                    outcome.failures.len(),
                    outcome.failures.len() + outcome.completed
                );
            }
        }

        Command::Generate(args) => {
            let paths = generate(&args)?;
            println!("Wrote {} files to {}", paths.len(), args.dir.display());
        }
    }

    Ok(())
}
