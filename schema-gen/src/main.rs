// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Writes the JSON schema for the `neosd build --config` file to stdout.

use neosd_gen::builder::Config;

fn main() -> Result<(), serde_json::Error> {
    let schema = schemars::schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
