//! Host-side helper: `cargo run [port]` builds the wasm bundle into
//! `static/pkg` and serves `static/` locally so the scenes can be viewed.

use std::process::{Command, ExitCode};
use std::{env, thread, time::Duration};

const DEFAULT_PORT: u16 = 8000;

fn build_wasm() -> bool {
    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) if st.success() => true,
        Ok(_) => {
            eprintln!("wasm-pack finished with errors.");
            false
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH (https://rustwasm.github.io/wasm-pack/). Serving existing static/pkg.");
            true
        }
    }
}

fn main() -> ExitCode {
    let port = match env::args().nth(1).map(|arg| arg.parse::<u16>()) {
        None => DEFAULT_PORT,
        Some(Ok(port)) => port,
        Some(Err(_)) => {
            eprintln!("usage: cargo run [port]");
            return ExitCode::FAILURE;
        }
    };

    if !build_wasm() {
        return ExitCode::FAILURE;
    }

    println!("Serving static/ at http://127.0.0.1:{port} …");
    let server = Command::new("python3")
        .args(["-m", "http.server", &port.to_string(), "--directory", "static"])
        .spawn();
    let mut server = match server {
        Ok(child) => child,
        Err(err) => {
            eprintln!("failed to start http server: {err}");
            return ExitCode::FAILURE;
        }
    };

    // Keep process alive while the server runs.
    loop {
        match server.try_wait() {
            Ok(Some(status)) => {
                eprintln!("http server exited: {status}");
                return ExitCode::FAILURE;
            }
            Ok(None) => thread::sleep(Duration::from_secs(1)),
            Err(err) => {
                eprintln!("lost track of http server: {err}");
                return ExitCode::FAILURE;
            }
        }
    }
}
