mod bench;

use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pixles_grid=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let code = match bench::maybe_parse_args(std::env::args().skip(1)) {
        Ok(Some(args)) => match bench::run_benchmark(args) {
            Ok(code) => code,
            Err(err) => {
                eprintln!("Benchmark failed: {err:#}");
                1
            }
        },
        Ok(None) => {
            eprintln!("{}", bench::USAGE);
            2
        }
        Err(err) => {
            eprintln!("{err:#}");
            eprintln!("{}", bench::USAGE);
            2
        }
    };
    std::process::exit(code);
}
