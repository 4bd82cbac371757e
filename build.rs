fn main() {
    // The desktop shell needs tauri.conf.json processed at build time;
    // the headless library builds without it.
    #[cfg(feature = "desktop")]
    tauri_build::build();

    println!("cargo:rerun-if-changed=tauri.conf.json");
}
