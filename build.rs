fn main() {
    println!("cargo:rerun-if-changed=resources/crosshair.rc");
    println!("cargo:rerun-if-changed=resources/crosshair.png");

    // Embeds the crosshair PNG as RCDATA 129. A no-op when not targeting Windows.
    embed_resource::compile("resources/crosshair.rc", embed_resource::NONE)
        .manifest_optional()
        .unwrap();
}
