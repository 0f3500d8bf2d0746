//! Policy storage example
//!
//! Demonstrates saving, loading and clearing policies through the storage
//! contract, with timings reported to a log handler.
//!
//! Run with: cargo run --example policy_storage

use policy_engine_logger::prelude::*;
use serde_json::json;

fn sync_policies(storage: &dyn PolicyStorage, remote: &PolicyMap) -> StorageResult<usize> {
    let local = storage.load_policies()?;
    if &local != remote {
        storage.save_policies(remote)?;
    }
    Ok(remote.len())
}

fn main() -> StorageResult<()> {
    println!("=== Policy Engine Logger - Policy Storage Example ===\n");

    let handler = LogHandler::builder()
        .debug_mode(true)
        .appender(ConsoleAppender::new())
        .build();
    handler.set_screen("Storage");

    let dir = std::env::temp_dir().join("policy_engine_logger_demo");
    let file_storage = FilePolicyStorage::new(dir.join("policies.json")).with_logger(handler.clone());
    let memory_storage = InMemoryPolicyStorage::new();

    let mut remote = PolicyMap::new();
    remote.insert("session.timeout".to_string(), json!({"minutes": 30}));
    remote.insert("password.min_length".to_string(), json!(12));

    let backends: [&dyn PolicyStorage; 2] = [&file_storage, &memory_storage];
    for storage in backends {
        let count = sync_policies(storage, &remote)?;
        println!("   {} backend holds {} policies", storage.name(), count);
    }

    println!("\n1. Reading back from disk:");
    for (id, value) in file_storage.load_policies()? {
        println!("   {} = {}", id, value);
    }

    println!("\n2. Invalid identifiers are rejected:");
    let mut invalid = PolicyMap::new();
    invalid.insert("  ".to_string(), json!(true));
    if let Err(e) = file_storage.save_policies(&invalid) {
        println!("   rejected: {}", e);
    }

    println!("\n3. Clearing:");
    file_storage.clear_policies()?;
    println!("   policies left: {}", file_storage.load_policies()?.len());

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
