#![forbid(unsafe_code)]

fn main() {
    std::process::exit(catalog_lens_cli::run());
}
