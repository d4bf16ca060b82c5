fn main() {
    // Build stamp surfaced by `webpilot --version`-adjacent output.
    let build_date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    println!("cargo:rustc-env=BUILD_DATE={build_date}");
}
