// src/main.rs

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() {
    room_viewer::run().await;
}

// The web build starts through `run`'s wasm_bindgen(start) hook.
#[cfg(target_arch = "wasm32")]
fn main() {}
