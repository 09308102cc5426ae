//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    osm_lang_cli::init_logging();
    if let Err(err) = osm_lang_cli::run() {
        eprintln!("osm-lang: {err}");
        std::process::exit(1);
    }
}
