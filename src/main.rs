fn main() {
    if let Err(err) = pedigree_rs_renderer::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
