//! Minimal wire-protocol client.
//!
//! Start the daemon first:
//!
//! ```bash
//! sleipnird --endpoint tcp://127.0.0.1:12345 --thread 2
//! ```
//!
//! then run the example:
//!
//! ```bash
//! cargo run --example simple_client -- tcp://127.0.0.1:12345
//! ```
//!
//! It creates a kernel, compiles an EPR-pair macro into it, creates a
//! system, and samples the macro a few times through `compute_result`.

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

async fn call(stream: &mut TcpStream, method: &str, parameters: Value) -> anyhow::Result<Value> {
    let body = json!({ "method": method, "parameters": parameters });
    let mut frame = serde_json::to_vec(&body)?;
    frame.push(0);
    stream.write_all(&frame).await?;

    let mut reply = Vec::new();
    let mut byte = [0_u8; 1];
    loop {
        stream.read_exact(&mut byte).await?;
        if byte[0] == 0 {
            break;
        }
        reply.push(byte[0]);
    }
    let reply: Value = serde_json::from_slice(&reply)?;
    if reply.get("error").is_some() {
        anyhow::bail!("{method} failed: {}", reply["result"]);
    }
    Ok(reply["result"].clone())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tcp://127.0.0.1:12345".to_owned());
    let address = endpoint
        .strip_prefix("tcp://")
        .ok_or_else(|| anyhow::anyhow!("this example only speaks tcp:// endpoints"))?;

    let mut stream = TcpStream::connect(address).await?;

    let kernel = call(&mut stream, "create_kernel", json!([])).await?;
    println!("kernel: {kernel}");

    let epr = call(
        &mut stream,
        "compile_macro",
        json!([kernel, "chpext", "init 2\nh 0\nc 0,1\nm 0\nm 1\n", 10]),
    )
    .await?;
    println!("macro: {epr}");

    let system = call(&mut stream, "create_system", json!(["chp_state"])).await?;
    println!("system: {system}");

    for _ in 0..5 {
        let bits = call(
            &mut stream,
            "compute_result",
            json!([system, "chpext", format!("macro {kernel},{epr}\n"), 10]),
        )
        .await?;
        println!("epr sample: {bits}");
    }

    Ok(())
}
