// ── Domain model ──
//
// Canonical catalogue types consumed by the CLI and TUI. Built from the
// wire types in `shopview-api` by `crate::convert`.

pub mod product;

pub use product::{Product, ProductId, Rating};
