//! Sykli CI pipeline for piab
//!
//! Run locally: sykli run
//! Or: cargo run --bin sykli --features sykli -- --emit | sykli run -

use sykli::{Condition, Pipeline, Template};

fn main() {
    let mut p = Pipeline::new();

    // === RESOURCES ===
    let src = p.dir(".");
    let cargo_registry = p.cache("cargo-registry");
    let cargo_git = p.cache("cargo-git");
    let target_cache = p.cache("target");

    // === TEMPLATE ===
    let rust = Template::new()
        .container("rust:1.85")
        .mount_dir(&src, "/src")
        .mount_cache(&cargo_registry, "/usr/local/cargo/registry")
        .mount_cache(&cargo_git, "/usr/local/cargo/git")
        .mount_cache(&target_cache, "/src/target")
        .workdir("/src");

    // === TASKS ===

    // Unit and loopback HTTP tests (no MongoDB needed)
    let _ = p
        .task("test")
        .from(&rust)
        .run("cargo test")
        .inputs(&["**/*.rs", "templates/*.tmpl", "Cargo.toml", "Cargo.lock"]);

    let _ = p
        .task("lint")
        .from(&rust)
        .run("cargo clippy --all-targets -- -D warnings")
        .inputs(&["**/*.rs", "Cargo.toml", "Cargo.lock"]);

    let _ = p
        .task("fmt")
        .from(&rust)
        .run("cargo fmt -- --check")
        .inputs(&["**/*.rs"]);

    // Release binary, only after the checks pass
    let _ = p
        .task("build")
        .from(&rust)
        .run("cargo build --release --bin piab")
        .inputs(&["**/*.rs", "Cargo.toml", "Cargo.lock"])
        .output("binary", "target/release/piab")
        .after(&["test", "lint", "fmt"]);

    // Smoke test against a real MongoDB, on push only
    let _ = p
        .task("smoke-test")
        .container("mongo:7")
        .mount(&src, "/src")
        .workdir("/src")
        .run(
            r#"#!/bin/bash
set -e

mongod --fork --logpath /tmp/mongod.log --bind_ip 127.0.0.1
mkdir -p /tmp/piab

RUST_LOG=info ./target/release/piab \
  --bind-addr 127.0.0.1 \
  --mongo-server 127.0.0.1 \
  --rules-output /tmp/piab/prometheus.rules \
  --alertmanager-output /tmp/piab/alertmanager.yml \
  --reload-timeout-secs 2 2>&1 | tee /tmp/piab-log.txt &
PIAB_PID=$!
sleep 3

exec 3<>/dev/tcp/127.0.0.1/12345
printf 'POST /v1/receivers HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: 27\r\nConnection: close\r\n\r\n{"email":"ops@example.com"}' >&3
RESPONSE=$(cat <&3)
if ! echo "$RESPONSE" | grep -q '"email": "ops@example.com"'; then
  echo "ERROR: create receiver failed"
  echo "$RESPONSE"
  cat /tmp/piab-log.txt
  exit 1
fi

COUNT=$(mongosh --quiet piab --eval 'db.receivers.countDocuments()')
if [ "$COUNT" != "1" ]; then
  echo "ERROR: expected 1 receiver document, got $COUNT"
  cat /tmp/piab-log.txt
  exit 1
fi

echo "Smoke test passed"
kill $PIAB_PID || true
"#,
        )
        .input_from("build", "binary", "/src/target/release/piab")
        .when_cond(Condition::event("push").or(Condition::negate(Condition::branch("*"))))
        .timeout(300);

    p.emit();
}
