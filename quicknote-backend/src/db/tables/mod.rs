//! Table operations - each module contains `impl Database` blocks for one table.

mod kv_store;
