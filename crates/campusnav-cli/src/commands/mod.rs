// Subcommand handlers.
//
// main.rs parses arguments and dispatches here; each module owns the
// arguments and rendering of one group of subcommands.

pub mod geometry;
pub mod indoor;
pub mod polyline;
pub mod routes;
pub mod shuttle;
