fn main() {
    built::write_built_file().expect("Failed to acquire build-time information");

    // Pass through DIRECTORY_BUILD_ID from the release pipeline
    println!("cargo:rerun-if-env-changed=DIRECTORY_BUILD_ID");
    if let Ok(id) = std::env::var("DIRECTORY_BUILD_ID") {
        println!("cargo:rustc-env=DIRECTORY_BUILD_ID={}", id);
    }
}
