//! Demo app composition
//!
//! The entry-point wiring of the two illustrative pairs. Composition is
//! one-shot and ordered: build the producer, extract a handle or a name,
//! build the consumer with it, add both to the app. The producer always
//! precedes the consumer, and that order doubles as the deploy order.

use crosstack_core::{
    auto_export_name, App, EnvValue, FunctionSpec, KeyAttribute, KeyType, Stack, TableHandle,
    TableRef, TableSpec,
};

pub const PRODUCER_STACK: &str = "producer";
pub const CONSUMER_STACK: &str = "consumer";
pub const USERS_TABLE_ID: &str = "UsersTable";
pub const READER_FUNCTION_ID: &str = "ReadUsers";

/// How the consumer refers to the producer's table
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Variant {
    /// Typed handle from the producer: couples the two artifacts
    Direct,
    /// Shared name string from configuration: artifacts stay independent
    Config,
}

/// Extra export channel pinned during the decoupling migration
pub fn migration_export_name() -> String {
    format!("{}:migration", auto_export_name(PRODUCER_STACK, USERS_TABLE_ID))
}

fn producer_stack(table_name: &str) -> (Stack, TableHandle) {
    let mut stack = Stack::new(PRODUCER_STACK);
    let handle = stack.add_table(TableSpec::new(
        USERS_TABLE_ID,
        table_name,
        KeyAttribute::new("userId", KeyType::String),
    ));
    (stack, handle)
}

fn consumer_stack(table: TableRef) -> Stack {
    let mut stack = Stack::new(CONSUMER_STACK);
    stack.add_function(
        FunctionSpec::new(READER_FUNCTION_ID, "index.handler", "node22")
            .with_env("USERS_TABLE_NAME", EnvValue::TableName(table.clone())),
    );
    stack.grant_read(READER_FUNCTION_ID, table);
    stack
}

/// Compose the demo app for a linking variant
pub fn demo_app(variant: Variant, table_name: &str) -> App {
    let (producer, handle) = producer_stack(table_name);

    let table = match variant {
        // Handle minted by the producer, passed straight to the consumer
        Variant::Direct => TableRef::ByHandle(handle),
        // Only the name is shared; the consumer re-resolves on its own
        Variant::Config => TableRef::ByName(table_name.to_string()),
    };

    let mut app = App::new();
    app.add_stack(producer);
    app.add_stack(consumer_stack(table));
    app
}

/// Phase-B composition of the decoupling migration: the producer pins the
/// original export channel plus a dummy channel, while the consumer is
/// re-pointed at the plain name. Deployed together, in either order.
pub fn half_decoupled_app(table_name: &str) -> App {
    let (mut producer, _) = producer_stack(table_name);
    producer.export_table_name(
        auto_export_name(PRODUCER_STACK, USERS_TABLE_ID),
        USERS_TABLE_ID,
    );
    producer.export_table_name(migration_export_name(), USERS_TABLE_ID);

    let mut app = App::new();
    app.add_stack(producer);
    app.add_stack(consumer_stack(TableRef::ByName(table_name.to_string())));
    app
}

/// Phase-C composition: every pinned channel removed. Redeploying just the
/// producer from this app completes the migration.
pub fn decoupled_app(table_name: &str) -> App {
    demo_app(Variant::Config, table_name)
}
