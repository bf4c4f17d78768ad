//! # envfig demo application
//!
//! A tiny program that loads its settings through envfig and prints them. It
//! exists to try the layering by hand.
//!
//! ```sh
//! cargo run --example envfig_demo
//! ENVFIG_DEMO_SERVER_PORT=9999 cargo run --example envfig_demo
//! ENVFIG_DEMO_CONFIG_PATH=/tmp/demo.json cargo run --example envfig_demo
//! ```
//!
//! | Feature                 | How to exercise it                                              |
//! |-------------------------|-----------------------------------------------------------------|
//! | File creation           | First run writes `<config dir>/envfig-demo/config.yml`          |
//! | Sparse file overlay     | Edit that file, keep only `greeting: hi`, run again             |
//! | Env var override        | `ENVFIG_DEMO_GREETING=hey`                                      |
//! | Nested env var          | `ENVFIG_DEMO_SERVER_PORT=9999`                                  |
//! | Optional section        | `ENVFIG_DEMO_TLS_CERT=/etc/cert.pem` allocates `tls`            |
//! | Duration parsing        | `ENVFIG_DEMO_SERVER_TIMEOUT=1m30s`                              |
//! | Validation              | `ENVFIG_DEMO_SERVER_PORT=0`                                     |
//! | Path override           | `ENVFIG_DEMO_CONFIG_PATH=/tmp/demo.json`                        |

use std::time::Duration;

use serde::{Deserialize, Serialize};

use envfig::{Envfig, Rules, Tracing};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct DemoConfig {
    greeting: String,
    server: Server,
    tls: Option<Tls>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Server {
    host: String,
    port: u16,
    #[serde(with = "humantime_serde")]
    timeout: Duration,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Tls {
    cert: String,
    verify: bool,
}

envfig::env_struct!(DemoConfig { greeting, server, tls });
envfig::env_struct!(Server { host, port, timeout });
envfig::env_struct!(Tls { cert, verify });

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let provider = Envfig::builder::<DemoConfig>()
        .persistence("envfig-demo")
        .env_prefix("ENVFIG_DEMO")
        .streams(Tracing::default())
        .model(|_| {
            Ok(Box::new(
                Rules::new()
                    .default_value("greeting", |c: &mut DemoConfig| &mut c.greeting, "hello".to_string())
                    .default_value("server.host", |c: &mut DemoConfig| &mut c.server.host, "127.0.0.1".to_string())
                    .default_value("server.port", |c: &mut DemoConfig| &mut c.server.port, 8080)
                    .default_value(
                        "server.timeout",
                        |c: &mut DemoConfig| &mut c.server.timeout,
                        Duration::from_secs(30),
                    )
                    .check("server.port", |c: &DemoConfig| c.server.port != 0, "must be nonzero"),
            ))
        })
        .build();

    let provider = match provider {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    match provider.get() {
        Ok(loaded) => {
            if let Some(path) = &loaded.path {
                println!("file:    {} (created: {})", path.display(), loaded.file_created);
            }
            println!("{:#?}", loaded.config);
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
