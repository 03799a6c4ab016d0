/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `provision` — Create the Connected App and authorize it across organizations
- `cleanup`   — Delete every Connected App after a two-step confirmation
- `scopes`    — Print how the scope catalog is classified

Each handler receives the run's [`Config`](crate::config::Config) explicitly
and builds whatever clients it needs from it.
*/

pub mod cleanup;
pub mod provision;
pub mod scopes;
